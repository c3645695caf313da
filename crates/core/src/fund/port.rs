use super::entity::{FundScheme, SchemeQuote};
use super::error::UpstreamError;
use async_trait::async_trait;
use std::collections::BTreeSet;

/// # Summary
/// 上游基金数据提供者接口。
///
/// # Invariants
/// - 每次调用都是一次独立的同步请求/响应，不做缓存与重试。
/// - 实现必须对外呼叫设置超时。
#[async_trait]
pub trait FundDataProvider: Send + Sync {
    /// # Summary
    /// 获取全部开放式基金的家族名称 (去重)。
    ///
    /// # Logic
    /// 1. 拉取全部开放式方案。
    /// 2. 提取 `Mutual_Fund_Family` 字段并去重。
    ///
    /// # Returns
    /// 有序的家族名称集合，或 `UpstreamError`。
    async fn list_fund_families(&self) -> Result<BTreeSet<String>, UpstreamError>;

    /// # Summary
    /// 获取指定基金家族下的所有开放式方案。
    ///
    /// # Arguments
    /// * `family`: 基金家族名称。
    ///
    /// # Returns
    /// 方案列表，上游非 2xx 时返回 `UpstreamError::Status`。
    async fn fetch_schemes_for_family(&self, family: &str)
    -> Result<Vec<FundScheme>, UpstreamError>;

    /// # Summary
    /// 获取单个方案的最新净值与名称，用于购买时定价。
    ///
    /// # Arguments
    /// * `scheme_code`: 基金代码。
    ///
    /// # Returns
    /// 方案报价 (名称可能缺失)，或 `UpstreamError`。
    async fn fetch_scheme_value(&self, scheme_code: &str) -> Result<SchemeQuote, UpstreamError>;
}
