//! # DTO (Data Transfer Object) 层
//!
//! 将内部领域模型转化为面向前端 JSON 输出的轻量结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use navgate_core::store::port::PurchaseRecord;

// ============================================================
//  鉴权 DTO
// ============================================================

/// 登录请求体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// 用户名
    #[schema(example = "demo")]
    pub username: String,
    /// 密码
    #[schema(example = "password123")]
    pub password: String,
}

/// 登录成功返回的 Token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// JWT Bearer Token
    #[schema(example = "eyJhbGciOiJIUzI1NiIs...")]
    pub access_token: String,
    /// 固定为 "bearer"
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Token 有效期 (秒)
    #[schema(example = 1800)]
    pub expires_in: i64,
}

// ============================================================
//  基金 DTO
// ============================================================

/// 基金家族列表
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FamiliesResponse {
    #[schema(example = json!(["Sample Mutual Fund"]))]
    pub families: Vec<String>,
}

/// 购买请求体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PurchaseRequest {
    /// 基金代码
    #[schema(example = "100001")]
    pub scheme_code: String,
    /// 购买份额，必须为正整数
    #[schema(example = 10)]
    pub units: i64,
}

/// 购买结果
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PurchaseResponse {
    #[schema(example = "Purchased 10 units of Sample Fund")]
    pub message: String,
    /// 购买时的单位净值
    #[schema(example = 25.5)]
    pub current_value: f64,
}

/// 已购买记录
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PurchaseRecordResponse {
    #[schema(example = "Sample Fund")]
    pub scheme_name: String,
    #[schema(example = 10)]
    pub units: i64,
    /// 购买时间 (ISO 8601)
    #[schema(example = "2026-10-19T08:30:00Z")]
    pub purchase_time: DateTime<Utc>,
    #[schema(example = 25.5)]
    pub value: f64,
}

// ============================================================
//  通用响应 DTO
// ============================================================

/// 简单文本消息
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Welcome to the Mutual Fund API!")]
    pub message: String,
}

/// 错误响应体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 错误描述信息
    #[schema(example = "Could not validate credentials")]
    pub detail: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self { detail: msg.into() }
    }
}

// ============================================================
//  领域模型 → DTO 惯用转换 (impl From<T>)
// ============================================================

impl From<PurchaseRecord> for PurchaseRecordResponse {
    fn from(r: PurchaseRecord) -> Self {
        Self {
            scheme_name: r.scheme_name,
            units: r.units,
            purchase_time: r.purchase_time,
            value: r.value,
        }
    }
}
