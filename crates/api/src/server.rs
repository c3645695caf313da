//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use navgate_core::auth::port::CredentialVerifier;
use navgate_core::cache::port::FamilyCache;
use navgate_core::common::time::TimeProvider;
use navgate_core::fund::port::FundDataProvider;
use navgate_core::store::port::PurchaseLedger;

use crate::auth::token::TokenService;
use crate::routes::{auth, funds, system};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - 所有字段在服务启动前由 DI 容器注入，生命周期与进程等同。
/// - 请求之间不共享任何可变状态；唯一的进程级可变数据是 `families` 快照。
#[derive(Clone)]
pub struct AppState {
    /// 单一凭据校验
    pub credentials: Arc<dyn CredentialVerifier>,
    /// JWT 签发与校验
    pub tokens: Arc<TokenService>,
    /// 上游基金数据
    pub funds: Arc<dyn FundDataProvider>,
    /// 本地购买账本
    pub ledger: Arc<dyn PurchaseLedger>,
    /// 启动时填充的基金家族缓存
    pub families: Arc<dyn FamilyCache>,
    /// 购买时间来源
    pub clock: Arc<dyn TimeProvider>,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "navgate 基金净值网关 API",
        version = "0.1.0",
        description = "单用户鉴权的基金净值网关：转发上游行情查询，并在本地记录购买。",
        license(name = "MIT")
    ),
    tags(
        (name = "系统 (System)", description = "存活检查"),
        (name = "鉴权 (Auth)", description = "登录获取 JWT"),
        (name = "基金 (Funds)", description = "基金家族、方案查询与购买记录")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// 为 OpenAPI 文档注入全局 Bearer JWT 鉴权方案。
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        // 注册名为 "bearer_jwt" 的 HTTP Bearer 鉴权方案
        components.add_security_scheme(
            "bearer_jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("在此处填入 /login 返回的 access_token（无需 'Bearer ' 前缀）"))
                    .build(),
            ),
        );
    }
}

// ============================================================
//  服务构建与启动
// ============================================================

/// 构建完整的 axum 应用路由树 (含 Swagger UI 与请求追踪)。
pub fn build_router(state: AppState) -> Router {
    // 1. 无需鉴权的公开路由
    let public_router = OpenApiRouter::new()
        .routes(routes!(system::root))
        .routes(routes!(auth::login))
        .routes(routes!(funds::list_fund_families));

    // 2. 需要合法 JWT 的路由
    let protected_router = OpenApiRouter::new()
        .routes(routes!(funds::list_purchases))
        .routes(routes!(funds::purchase_units))
        .routes(routes!(funds::get_family_schemes))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::auth_middleware,
        ));

    // 3. 合并所有路由与自动收集的 OpenAPI Doc
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(public_router)
        .merge(protected_router)
        .with_state(state)
        .split_for_parts();

    // 4. 合并 Swagger UI 路由并应用请求追踪
    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(TraceLayer::new_for_http())
}

/// 启动 HTTP 监听，直到 `shutdown` 完成后优雅退出。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:8000"`
/// * `shutdown` - 退出信号
pub async fn start_server<F>(
    state: AppState,
    bind_addr: &str,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    tracing::info!("🚀 navgate API Server listening on {}", bind_addr);
    tracing::info!("📖 Swagger UI: http://{}/swagger-ui/", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
