use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// # Summary
/// 开放式基金方案实体，来自上游行情接口，本系统只读不落库。
///
/// # Invariants
/// - JSON 字段名与上游接口保持一致 (如 `Scheme_Code`)，以便原样转发给前端。
/// - `net_asset_value` 为最新单位净值，`date` 为上游给出的净值日期字符串。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FundScheme {
    /// 基金代码
    #[serde(rename = "Scheme_Code")]
    #[schema(example = 100001)]
    pub scheme_code: i64,
    /// 分红/增长型 ISIN
    #[serde(rename = "ISIN_Div_Payout_ISIN_Growth")]
    #[schema(example = "INF209K01157")]
    pub isin_growth: String,
    /// 红利再投资型 ISIN
    #[serde(rename = "ISIN_Div_Reinvestment")]
    #[schema(example = "INF209K01165")]
    pub isin_reinvestment: String,
    /// 基金名称
    #[serde(rename = "Scheme_Name")]
    #[schema(example = "Sample Fund")]
    pub name: String,
    /// 单位净值
    #[serde(rename = "Net_Asset_Value")]
    #[schema(example = 25.5)]
    pub net_asset_value: f64,
    /// 净值日期
    #[serde(rename = "Date")]
    #[schema(example = "18-Oct-2026")]
    pub date: String,
    /// 方案类型 (Open Ended Schemes 等)
    #[serde(rename = "Scheme_Type")]
    #[schema(example = "Open Ended Schemes")]
    pub scheme_type: String,
    /// 方案类别
    #[serde(rename = "Scheme_Category")]
    #[schema(example = "Equity Scheme - Large Cap Fund")]
    pub category: String,
    /// 所属基金家族 (基金公司)
    #[serde(rename = "Mutual_Fund_Family")]
    #[schema(example = "Sample Mutual Fund")]
    pub fund_family: String,
}

/// # Summary
/// 单个方案的报价，只用于购买定价。
///
/// # Invariants
/// - 只有 `Net_Asset_Value` 是必需字段，其余字段缺失时为 `None`。
/// - 不认识的字段一律忽略。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SchemeQuote {
    #[serde(rename = "Scheme_Code", default)]
    pub scheme_code: Option<i64>,
    #[serde(rename = "Scheme_Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Net_Asset_Value")]
    pub net_asset_value: f64,
}

impl From<FundScheme> for SchemeQuote {
    fn from(scheme: FundScheme) -> Self {
        Self {
            scheme_code: Some(scheme.scheme_code),
            name: Some(scheme.name),
            net_asset_value: scheme.net_asset_value,
        }
    }
}
