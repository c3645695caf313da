//! # 基金路由控制器
//!
//! 家族列表读取进程级缓存；方案查询与购买转发至上游，购买记录写入本地账本。

use axum::Json;
use axum::extract::{Path, State};

use navgate_core::fund::entity::FundScheme;
use navgate_core::store::port::NewPurchase;

use crate::error::ApiError;
use crate::middleware::auth::CurrentSubject;
use crate::server::AppState;
use crate::types::{
    ApiErrorResponse, FamiliesResponse, PurchaseRecordResponse, PurchaseRequest, PurchaseResponse,
};

/// 上游未给出名称时使用的占位名
const UNKNOWN_SCHEME: &str = "Unknown Scheme";

/// 获取基金家族列表
///
/// 返回启动时缓存的开放式基金家族名称，无需鉴权。
#[utoipa::path(
    get,
    path = "/fund_families",
    tag = "基金 (Funds)",
    responses(
        (status = 200, description = "家族名称列表", body = FamiliesResponse)
    )
)]
pub async fn list_fund_families(State(state): State<AppState>) -> Json<FamiliesResponse> {
    let snapshot = state.families.snapshot();
    Json(FamiliesResponse {
        families: snapshot.iter().cloned().collect(),
    })
}

/// 获取指定家族的开放式方案
#[utoipa::path(
    get,
    path = "/funds/{family}",
    tag = "基金 (Funds)",
    security(("bearer_jwt" = [])),
    params(
        ("family" = String, Path, description = "基金家族名称")
    ),
    responses(
        (status = 200, description = "方案列表", body = Vec<FundScheme>),
        (status = 401, description = "未认证", body = ApiErrorResponse),
        (status = "5XX", description = "上游失败，状态码透传", body = ApiErrorResponse)
    )
)]
pub async fn get_family_schemes(
    State(state): State<AppState>,
    CurrentSubject(subject): CurrentSubject,
    Path(family): Path<String>,
) -> Result<Json<Vec<FundScheme>>, ApiError> {
    tracing::debug!("{} requested schemes for family {}", subject, family);
    let schemes = state
        .funds
        .fetch_schemes_for_family(&family)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to fetch schemes"))?;
    Ok(Json(schemes))
}

/// 购买基金份额
///
/// 先向上游获取最新净值与名称，再在本地账本中追加一条记录。
/// 上游失败时不会写入任何记录；上游未给出名称时记为 `Unknown Scheme`。
///
/// 请求约束：`units` 必须为正整数，`scheme_code` 不能为空白。
/// 这是网关额外加的限制 (早期接口接受任意整数)，违反时在调用上游之前返回 400。
#[utoipa::path(
    post,
    path = "/funds/purchase",
    tag = "基金 (Funds)",
    security(("bearer_jwt" = [])),
    request_body = PurchaseRequest,
    responses(
        (status = 200, description = "购买成功", body = PurchaseResponse),
        (status = 400, description = "请求参数错误", body = ApiErrorResponse),
        (status = 401, description = "未认证", body = ApiErrorResponse),
        (status = "5XX", description = "上游或存储失败", body = ApiErrorResponse)
    )
)]
pub async fn purchase_units(
    State(state): State<AppState>,
    CurrentSubject(subject): CurrentSubject,
    Json(req): Json<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    // 1. 校验参数
    let scheme_code = req.scheme_code.trim();
    if scheme_code.is_empty() {
        return Err(ApiError::BadRequest("scheme_code must not be empty".into()));
    }
    if req.units <= 0 {
        return Err(ApiError::BadRequest("units must be a positive integer".into()));
    }

    // 2. 获取最新净值
    let quote = state
        .funds
        .fetch_scheme_value(scheme_code)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to fetch scheme value"))?;

    let scheme_name = quote
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_SCHEME.to_string());

    // 3. 写入账本 (单条记录、单个事务)
    let record = state
        .ledger
        .record_purchase(NewPurchase {
            scheme_name,
            units: req.units,
            purchase_time: state.clock.now(),
            value: quote.net_asset_value,
        })
        .await?;

    tracing::info!(
        "{} purchased {} units of {} at {} (record #{})",
        subject,
        record.units,
        record.scheme_name,
        record.value,
        record.id
    );

    Ok(Json(PurchaseResponse {
        message: format!("Purchased {} units of {}", record.units, record.scheme_name),
        current_value: record.value,
    }))
}

/// 获取全部购买记录
#[utoipa::path(
    get,
    path = "/funds/purchases",
    tag = "基金 (Funds)",
    security(("bearer_jwt" = [])),
    responses(
        (status = 200, description = "购买记录，按写入顺序", body = Vec<PurchaseRecordResponse>),
        (status = 401, description = "未认证", body = ApiErrorResponse),
        (status = 500, description = "存储失败", body = ApiErrorResponse)
    )
)]
pub async fn list_purchases(
    State(state): State<AppState>,
    CurrentSubject(_subject): CurrentSubject,
) -> Result<Json<Vec<PurchaseRecordResponse>>, ApiError> {
    let records = state.ledger.list_purchases().await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}
