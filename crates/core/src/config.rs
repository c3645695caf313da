use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub upstream: UpstreamConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// 监听地址，如 `"0.0.0.0:8000"`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 单一凭据与 Token 签名配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    pub jwt_secret: String,
    /// HS256 / HS384 / HS512
    pub jwt_algorithm: String,
    pub token_ttl_minutes: i64,
}

/// 上游 RapidAPI 基金行情接口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// 写入 `X-RapidAPI-Host` 请求头
    pub host: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` 语法，`RUST_LOG` 优先
    pub filter: String,
    /// 设置后额外按天滚动写入该目录
    pub dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            auth: AuthConfig {
                username: String::new(),
                password: String::new(),
                jwt_secret: String::new(),
                jwt_algorithm: "HS256".to_string(),
                token_ttl_minutes: 30,
            },
            upstream: UpstreamConfig {
                base_url: "https://latest-mutual-fund-nav.p.rapidapi.com".to_string(),
                host: "latest-mutual-fund-nav.p.rapidapi.com".to_string(),
                api_key: String::new(),
                timeout_secs: 10,
            },
            database: DatabaseConfig {
                data_dir: "data".to_string(),
            },
            logging: LoggingConfig {
                filter: "info".to_string(),
                dir: None,
            },
        }
    }
}
