//! # JWT 签发与校验
//!
//! 无状态的 Bearer Token：签发后不落库、不可吊销，
//! 轮换签名密钥会使所有已签发的 Token 立即失效。

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use navgate_core::auth::error::AuthError;
use navgate_core::common::time::TimeProvider;
use navgate_core::config::AuthConfig;

/// JWT Claims 内容 (内部使用，不暴露到 Swagger)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 登录用户名
    pub sub: String,
    /// 签发时间 (Unix 时间戳)
    pub iat: i64,
    /// Token 过期时间 (Unix 时间戳)
    pub exp: i64,
}

/// 一次签发的结果
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// # Summary
/// Token 服务：基于 HMAC 的 JWT 签发与校验。
///
/// # Invariants
/// - 算法与密钥在进程内全局唯一，构造后不可修改。
/// - 校验时 `leeway` 为 0，`exp` 与 `sub` 为必需声明。
/// - 校验只返回完整的 subject 或 `AuthError`，不存在部分成功。
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
    clock: Arc<dyn TimeProvider>,
}

impl TokenService {
    /// # Summary
    /// 创建 Token 服务。
    ///
    /// # Logic
    /// 1. 拒绝空密钥与非正的默认有效期。
    /// 2. 解析算法名，只接受 HS256 / HS384 / HS512。
    /// 3. 预先构造编解码密钥与校验规则。
    ///
    /// # Arguments
    /// * `secret` - 签名密钥。
    /// * `algorithm` - 算法名称。
    /// * `default_ttl` - `issue` 使用的默认有效期。
    /// * `clock` - 签发时间来源。
    ///
    /// # Returns
    /// 配置非法时返回 `AuthError::Config`。
    pub fn new(
        secret: &str,
        algorithm: &str,
        default_ttl: Duration,
        clock: Arc<dyn TimeProvider>,
    ) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Config("JWT secret must not be empty".into()));
        }
        ensure_positive_ttl(default_ttl)?;

        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|_| AuthError::Config(format!("Unknown JWT algorithm: {algorithm}")))?;
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(AuthError::Config(format!(
                "Only HMAC algorithms are supported, got {algorithm:?}"
            )));
        }

        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl,
            clock,
        })
    }

    /// 从鉴权配置创建
    pub fn from_config(config: &AuthConfig, clock: Arc<dyn TimeProvider>) -> Result<Self, AuthError> {
        Self::new(
            &config.jwt_secret,
            &config.jwt_algorithm,
            Duration::try_minutes(config.token_ttl_minutes).ok_or_else(|| {
                AuthError::Config(format!(
                    "Token TTL out of range: {} minutes",
                    config.token_ttl_minutes
                ))
            })?,
            clock,
        )
    }

    /// 默认有效期
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// 使用默认有效期签发 Token
    pub fn issue(&self, subject: &str) -> Result<AccessToken, AuthError> {
        self.issue_with_ttl(subject, self.default_ttl)
    }

    /// # Summary
    /// 使用指定有效期签发 Token。
    ///
    /// # Logic
    /// 1. 从时钟读取当前时间，过期时间 = now + ttl。
    /// 2. 写入 `sub` / `iat` / `exp` 声明并签名。
    ///
    /// # Returns
    /// `ttl` 非正或过期时间溢出时返回 `AuthError::Config`。
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<AccessToken, AuthError> {
        ensure_positive_ttl(ttl)?;
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Config(format!("Token expiry overflows: {ttl}")))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Config(format!("Failed to sign token: {e}")))?;

        Ok(AccessToken { token, expires_at })
    }

    /// # Summary
    /// 校验 Token 并返回其 subject。
    ///
    /// # Logic
    /// 1. 校验结构、算法、签名与 `exp`。
    /// 2. `sub` 缺失或为空视为无效。
    ///
    /// # Returns
    /// 成功返回 subject，任何失败返回 `AuthError::InvalidToken`。
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken("missing subject".into()));
        }
        Ok(data.claims.sub)
    }
}

fn ensure_positive_ttl(ttl: Duration) -> Result<(), AuthError> {
    if ttl <= Duration::zero() {
        return Err(AuthError::Config(format!("Token TTL must be positive, got {ttl}")));
    }
    Ok(())
}
