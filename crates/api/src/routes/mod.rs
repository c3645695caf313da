//! # 路由控制器

pub mod auth;
pub mod funds;
pub mod system;
