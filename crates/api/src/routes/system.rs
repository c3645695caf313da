use axum::Json;

use crate::types::MessageResponse;

/// 存活检查
#[utoipa::path(
    get,
    path = "/",
    tag = "系统 (System)",
    responses(
        (status = 200, description = "服务存活", body = MessageResponse)
    )
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the Mutual Fund API!".to_string(),
    })
}
