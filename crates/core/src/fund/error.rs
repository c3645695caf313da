use thiserror::Error;

/// # Summary
/// 上游基金行情接口错误枚举。
///
/// # Invariants
/// - `Status` 保留上游返回的原始 HTTP 状态码，由 API 层原样透传。
/// - 不做任何重试，错误直接交给调用方。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    // 上游返回非 2xx 状态码
    #[error("Upstream responded with HTTP {status}")]
    Status { status: u16 },
    // 网络层错误 (连接失败、TLS 等)
    #[error("Network error: {0}")]
    Network(String),
    // 请求超时
    #[error("Upstream request timed out")]
    Timeout,
    // 响应体无法解析为预期结构
    #[error("Parse error: {0}")]
    Parse(String),
    // 上游返回了空结果
    #[error("Scheme not found: {0}")]
    NotFound(String),
}
