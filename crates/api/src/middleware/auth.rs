//! # 鉴权中间件
//!
//! 提供基于 JWT 的身份验证：`Unauthenticated → TokenChecked`，
//! 通过后才进入各个 Handler 执行。

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use navgate_core::auth::error::AuthError;

use crate::error::ApiError;
use crate::server::AppState;

/// 已通过校验的 Token subject，由中间件写入 request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSubject(pub String);

/// 提取并验证 Authorization: Bearer <token>
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req)?;

    let subject = match state.tokens.verify(token) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("JWT verification failed on {}: {:?}", req.uri().path(), e);
            return Err(e.into());
        }
    };

    // 以便 downstream handlers 用 `CurrentSubject` 提取
    req.extensions_mut().insert(AuthenticatedSubject(subject));

    Ok(next.run(req).await)
}

/// 解析 Authorization 头，scheme 不区分大小写
fn bearer_token(req: &Request) -> Result<&str, ApiError> {
    let Some(header_val) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        tracing::warn!("Missing Authorization header");
        return Err(AuthError::MissingToken.into());
    };

    let raw = header_val
        .to_str()
        .map_err(|_| ApiError::from(AuthError::MissingToken))?;

    match raw.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => {
            tracing::warn!("Invalid Bearer format");
            Err(AuthError::MissingToken.into())
        }
    }
}

// 在提取器中获取当前 subject 的快捷方式
pub struct CurrentSubject(pub String);

impl<S> FromRequestParts<S> for CurrentSubject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let subject = parts
            .extensions
            .get::<AuthenticatedSubject>()
            .cloned()
            .ok_or(ApiError::Auth(AuthError::MissingToken))?;
        Ok(CurrentSubject(subject.0))
    }
}
