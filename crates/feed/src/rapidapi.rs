use async_trait::async_trait;
use navgate_core::config::UpstreamConfig;
use navgate_core::fund::entity::{FundScheme, SchemeQuote};
use navgate_core::fund::error::UpstreamError;
use navgate_core::fund::port::FundDataProvider;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "X-RapidAPI-Key";
const API_HOST_HEADER: &str = "X-RapidAPI-Host";

/// # Summary
/// 安装进程级 rustls 加密后端 (ring)。
///
/// # Logic
/// `reqwest` 以 `rustls-no-provider` 方式编译，构建客户端前必须有默认后端。
/// 重复安装会返回错误，这里视为已就绪。
pub fn ensure_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}

/// # Summary
/// RapidAPI 基金净值接口的提供者实现。
///
/// # Invariants
/// - 所有请求都带 `X-RapidAPI-Key` 与 `X-RapidAPI-Host` 请求头。
/// - 客户端级别设置超时，超时映射为 `UpstreamError::Timeout`。
/// - 不做重试，也不缓存响应。
#[derive(Clone)]
pub struct RapidApiFundProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// 不含末尾 `/` 的接口根地址
    base_url: String,
}

/// # Summary
/// 家族列表接口只关心 `Mutual_Fund_Family` 字段。
#[derive(Deserialize, Debug)]
struct FamilyRow {
    #[serde(rename = "Mutual_Fund_Family")]
    fund_family: Option<String>,
}

/// # Summary
/// 单个方案接口可能返回对象，也可能返回只含一个元素的数组。
/// 只要求净值字段存在，名称等字段缺失时交由调用方兜底。
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum SchemeValuePayload {
    One(SchemeQuote),
    Many(Vec<SchemeQuote>),
}

impl RapidApiFundProvider {
    /// # Summary
    /// 根据上游配置创建提供者。
    ///
    /// # Logic
    /// 1. 确保 rustls 加密后端已安装。
    /// 2. 构造带鉴权头的默认请求头。
    /// 3. 按 `timeout_secs` 配置请求超时并初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `config`: 上游接口配置。
    ///
    /// # Returns
    /// 初始化后的提供者；请求头非法或客户端构建失败时返回 `UpstreamError::Network`。
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        ensure_crypto_provider();

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, header_value(&config.api_key)?);
        headers.insert(API_HOST_HEADER, header_value(&config.host)?);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// # Summary
    /// 发起 GET 请求并解析 JSON 响应。
    ///
    /// # Logic
    /// 1. 拼接 URL 并携带查询参数发送请求。
    /// 2. 非 2xx 状态码映射为 `UpstreamError::Status`，保留原始状态码。
    /// 3. 反序列化失败映射为 `UpstreamError::Parse`。
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, UpstreamError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("Requesting {} {:?}", url, query);

        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(map_transport_error)?;

        let resp = check_status(resp, endpoint)?;
        resp.json::<T>()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))
    }
}

fn header_value(raw: &str) -> Result<HeaderValue, UpstreamError> {
    HeaderValue::from_str(raw)
        .map_err(|e| UpstreamError::Network(format!("Invalid upstream header value: {e}")))
}

fn map_transport_error(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Network(err.to_string())
    }
}

fn check_status(resp: Response, endpoint: &str) -> Result<Response, UpstreamError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    warn!("Upstream {} responded with HTTP {}", endpoint, status);
    Err(UpstreamError::Status {
        status: status.as_u16(),
    })
}

#[async_trait]
impl FundDataProvider for RapidApiFundProvider {
    /// # Summary
    /// 拉取全部开放式方案并提取去重后的家族名称。
    ///
    /// # Logic
    /// 1. 请求 `latest?Scheme_Type=Open`。
    /// 2. 丢弃缺失或为空的家族字段，其余收集进 `BTreeSet`。
    async fn list_fund_families(&self) -> Result<BTreeSet<String>, UpstreamError> {
        let rows: Vec<FamilyRow> = self
            .get_json("latest", &[("Scheme_Type", "Open")])
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|r| r.fund_family)
            .filter(|f| !f.trim().is_empty())
            .collect())
    }

    async fn fetch_schemes_for_family(
        &self,
        family: &str,
    ) -> Result<Vec<FundScheme>, UpstreamError> {
        self.get_json("fetch_schemes", &[("Mutual_Fund_Family", family)])
            .await
    }

    /// # Summary
    /// 获取单个方案的最新净值。
    ///
    /// # Logic
    /// 1. 请求 `fetch_scheme_value?Scheme_Code=...`。
    /// 2. 对象直接返回；数组取第一个元素，空数组视为 `NotFound`。
    async fn fetch_scheme_value(&self, scheme_code: &str) -> Result<SchemeQuote, UpstreamError> {
        let payload: SchemeValuePayload = self
            .get_json("fetch_scheme_value", &[("Scheme_Code", scheme_code)])
            .await?;

        match payload {
            SchemeValuePayload::One(scheme) => Ok(scheme),
            SchemeValuePayload::Many(schemes) => schemes
                .into_iter()
                .next()
                .ok_or_else(|| UpstreamError::NotFound(scheme_code.to_string())),
        }
    }
}
