//! # `navgate-store` - 本地持久化
//!
//! 基于 SQLite (`sqlx`) 的购买账本实现。

pub mod config;
pub mod purchase;
