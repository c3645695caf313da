//! # 单一凭据校验
//!
//! 进程启动时从配置加载一对用户名/密码，登录时做等量工作的比较。

use navgate_core::auth::port::CredentialVerifier;
use sha2::{Digest, Sha256};

/// # Summary
/// 基于单一静态凭据的 `CredentialVerifier` 实现。
///
/// # Invariants
/// - 只保存用户名与密码的 SHA-256 摘要，不保留明文。
/// - 比较总是同时处理两个字段的全部 32 字节，耗时与输入无关。
/// - 配置中用户名或密码为空时，任何登录都会失败。
pub struct StaticCredentialVerifier {
    username_digest: [u8; 32],
    password_digest: [u8; 32],
    enabled: bool,
}

impl StaticCredentialVerifier {
    /// # Summary
    /// 根据配置的用户名与密码创建校验器。
    ///
    /// # Arguments
    /// * `username` - 唯一允许登录的用户名。
    /// * `password` - 对应的明文密码。
    pub fn new(username: &str, password: &str) -> Self {
        let enabled = !username.is_empty() && !password.is_empty();
        if !enabled {
            tracing::warn!("Login credentials are not configured; every login will be rejected");
        }
        Self {
            username_digest: digest(username),
            password_digest: digest(password),
            enabled,
        }
    }
}

impl CredentialVerifier for StaticCredentialVerifier {
    fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = digests_equal(&self.username_digest, &digest(username));
        let pass_ok = digests_equal(&self.password_digest, &digest(password));
        // 按位与，不短路
        self.enabled & user_ok & pass_ok
    }
}

fn digest(value: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(value.as_bytes()));
    out
}

/// 逐字节异或累积，不提前退出
fn digests_equal(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
