use thiserror::Error;

/// # Summary
/// 鉴权域错误枚举，覆盖登录失败、Token 缺失或无效以及签名配置错误。
///
/// # Invariants
/// - 除 `Config` 外，所有变体在 HTTP 层都映射为 401 并携带 `WWW-Authenticate: Bearer`。
/// - 不向调用方区分"签名错误"与"已过期"，避免泄露校验细节。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    // 用户名或密码错误
    #[error("Incorrect username or password")]
    InvalidCredentials,
    // 请求未携带 Bearer Token
    #[error("Not authenticated")]
    MissingToken,
    // Token 结构、签名、过期或声明缺失，内部原因仅用于日志
    #[error("Could not validate credentials: {0}")]
    InvalidToken(String),
    // 签名密钥或算法配置非法
    #[error("Token service misconfigured: {0}")]
    Config(String),
}
