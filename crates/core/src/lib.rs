//! # `navgate-core` - 领域核心
//!
//! 只定义实体、端口 (trait) 与错误类型，不包含任何 IO 实现。
//! 具体实现分别位于 `navgate-feed` (上游行情)、`navgate-store` (本地账本)、
//! `navgate-cache` (基金家族缓存) 与 `navgate-api` (鉴权与 HTTP 管道)。

pub mod config;

pub mod common {
    pub mod time;
}

pub mod auth {
    pub mod error;
    pub mod port;
}

pub mod fund {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod store {
    pub mod error;
    pub mod port;
}

pub mod cache {
    pub mod port;
}

#[cfg(feature = "test-utils")]
pub mod test_utils;
