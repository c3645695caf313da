/// # Summary
/// 凭据校验接口，将"谁可以登录"与 Token 签发、请求管道解耦。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync`，在所有请求间共享。
/// - 校验失败只返回 `false`，从不报错，也不暴露失败原因。
pub trait CredentialVerifier: Send + Sync {
    /// # Summary
    /// 校验用户名与密码是否匹配。
    ///
    /// # Arguments
    /// * `username` - 登录请求中的用户名。
    /// * `password` - 登录请求中的明文密码。
    ///
    /// # Returns
    /// 匹配返回 `true`，否则返回 `false`。
    fn verify(&self, username: &str, password: &str) -> bool;
}
