//! # 配置加载
//!
//! 优先级从低到高：内置默认值 → 可选的 `navgate.toml` → `NAVGATE__SECTION__KEY`
//! 环境变量 → 历史遗留的 `DUMMY_USERNAME` / `DUMMY_PASSWORD` / `SECRET_KEY` / `RAPIDAPI_KEY`。

use std::collections::HashMap;

use config::{Config, ConfigError, Environment, File};
use navgate_core::config::AppConfig;

/// 默认配置文件名 (不含扩展名)
const CONFIG_FILE: &str = "navgate";

/// 遗留环境变量 → 配置键
const LEGACY_ENV: [(&str, &str); 4] = [
    ("DUMMY_USERNAME", "auth.username"),
    ("DUMMY_PASSWORD", "auth.password"),
    ("SECRET_KEY", "auth.jwt_secret"),
    ("RAPIDAPI_KEY", "upstream.api_key"),
];

/// 从进程环境加载配置
pub fn load() -> Result<AppConfig, ConfigError> {
    build(Some(CONFIG_FILE), None)
}

/// # Summary
/// 组装分层配置。
///
/// # Arguments
/// * `file` - 可选配置文件名，文件不存在时忽略。
/// * `env` - 测试时替代进程环境变量的映射；`None` 表示读取真实环境。
pub fn build(
    file: Option<&str>,
    env: Option<HashMap<String, String>>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

    if let Some(name) = file {
        builder = builder.add_source(File::with_name(name).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("NAVGATE")
            .separator("__")
            .try_parsing(true)
            .source(env.clone()),
    );

    for (var, key) in LEGACY_ENV {
        let value = match &env {
            Some(map) => map.get(var).cloned(),
            None => std::env::var(var).ok(),
        };
        builder = builder.set_override_option(key, value)?;
    }

    builder.build()?.try_deserialize()
}
