//! # API 统一错误处理
//!
//! 将下层各 crate 的错误类型统一映射到 HTTP 状态码与 JSON 响应体。

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use navgate_core::auth::error::AuthError;
use navgate_core::fund::error::UpstreamError;
use navgate_core::store::error::StoreError;

use crate::types::ApiErrorResponse;

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 认证失败 (401，配置错误为 500)
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// 上游接口失败，状态码透传
    #[error("{detail} ({source})")]
    Upstream {
        status: StatusCode,
        detail: String,
        source: UpstreamError,
    },

    /// 请求参数错误 (400)
    #[error("请求参数错误: {0}")]
    BadRequest(String),

    /// 下层业务错误 (500)
    #[error("内部服务错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// # Summary
    /// 包装上游错误，附带面向客户端的通用描述。
    ///
    /// # Logic
    /// - `Status` 在 100..=599 内原样透传，其余退化为 502。
    /// - 网络与解析错误返回 502，超时返回 504，空结果返回 404。
    pub fn upstream(source: UpstreamError, detail: &str) -> Self {
        let status = match &source {
            UpstreamError::Status { status: status @ 100..=599 } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            UpstreamError::Status { .. } => StatusCode::BAD_GATEWAY,
            UpstreamError::Network(_) | UpstreamError::Parse(_) => StatusCode::BAD_GATEWAY,
            UpstreamError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            UpstreamError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        ApiError::Upstream {
            status,
            detail: detail.to_string(),
            source,
        }
    }
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, challenge) = match self {
            ApiError::Auth(AuthError::Config(msg)) => {
                tracing::error!("Token service error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    false,
                )
            }
            ApiError::Auth(AuthError::InvalidToken(reason)) => {
                // 只记录具体原因，对外统一描述
                tracing::warn!("Token rejected: {}", reason);
                (
                    StatusCode::UNAUTHORIZED,
                    "Could not validate credentials".to_string(),
                    true,
                )
            }
            ApiError::Auth(err) => (StatusCode::UNAUTHORIZED, err.to_string(), true),
            ApiError::Upstream {
                status,
                detail,
                source,
            } => {
                tracing::warn!("Upstream call failed with {}: {}", status, source);
                (status, detail, false)
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, false),
            ApiError::Internal(msg) => {
                // 内部错误只记录日志，不向客户端透传细节
                tracing::error!("内部服务错误: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    false,
                )
            }
        };

        let mut response = (status, Json(ApiErrorResponse::from_msg(message))).into_response();
        if challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// 从 `StoreError` 转换
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
