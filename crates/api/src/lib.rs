//! # `navgate-api` - HTTP API 网关
//!
//! 本 crate 是 navgate 基金净值网关的 HTTP/REST 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 校验单一凭据并颁发 JWT (`auth`)
//! - 通过中间件校验 Bearer Token 后分发至受保护路由 (`middleware`)
//! - 调用上游 `FundDataProvider` 与本地 `PurchaseLedger` 完成业务操作 (`routes`)
//! - 将领域错误统一映射为 HTTP 响应 (`error`)

pub mod auth;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod types;
