//! # 身份验证路由控制器

use axum::Json;
use axum::extract::State;

use navgate_core::auth::error::AuthError;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, LoginRequest, LoginResponse};

/// 用户登录
///
/// 验证用户名和密码，颁发 JWT Token。
#[utoipa::path(
    post,
    path = "/login",
    tag = "鉴权 (Auth)",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功", body = LoginResponse),
        (status = 401, description = "用户名或密码错误", body = ApiErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // 1. 验证凭据
    if !state.credentials.verify(&req.username, &req.password) {
        tracing::warn!("Failed login attempt for user: {}", req.username);
        return Err(AuthError::InvalidCredentials.into());
    }

    // 2. 生成 JWT
    let issued = state.tokens.issue(&req.username)?;
    tracing::info!("Issued access token for user: {}", req.username);

    Ok(Json(LoginResponse {
        access_token: issued.token,
        token_type: "bearer".to_string(),
        expires_in: state.tokens.default_ttl().num_seconds(),
    }))
}
