use std::path::PathBuf;
use std::sync::Arc;

use navgate_api::auth::credential::StaticCredentialVerifier;
use navgate_api::auth::token::TokenService;
use navgate_api::server::{AppState, start_server};
use navgate_cache::family::MemFamilyCache;
use navgate_core::cache::port::FamilyCache;
use navgate_core::common::time::{RealTimeProvider, TimeProvider};
use navgate_core::fund::port::FundDataProvider;
use navgate_feed::rapidapi::RapidApiFundProvider;
use navgate_store::purchase::SqlitePurchaseLedger;
use tracing::{info, warn};

mod logging;
mod settings;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 `AppState`。
///
/// # Logic
/// 1. 加载配置并初始化全局日志。
/// 2. 实例化基础设施层（账本、上游、缓存）。
/// 3. 预热基金家族缓存（失败不阻止启动）。
/// 4. 构造鉴权组件并启动 HTTP 服务。
/// 5. 收到退出信号后优雅关闭。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载配置、初始化日志
    let config = settings::load()?;
    let _log_guard = logging::init(&config.logging)?;
    info!("navgate starting...");

    // 2. 实例化基础设施层
    if !navgate_store::config::set_root_dir(PathBuf::from(&config.database.data_dir)) {
        warn!("Storage root already set; ignoring {}", config.database.data_dir);
    }
    let ledger = Arc::new(SqlitePurchaseLedger::new().await?);
    let funds = Arc::new(RapidApiFundProvider::new(&config.upstream)?);
    let families = Arc::new(MemFamilyCache::new());

    // 3. 预热家族缓存
    warm_family_cache(funds.as_ref(), families.as_ref()).await;

    // 4. 鉴权组件
    let clock: Arc<dyn TimeProvider> = Arc::new(RealTimeProvider);
    let tokens = Arc::new(TokenService::from_config(&config.auth, clock.clone())?);
    let credentials = Arc::new(StaticCredentialVerifier::new(
        &config.auth.username,
        &config.auth.password,
    ));

    let state = AppState {
        credentials,
        tokens,
        funds,
        ledger,
        families,
        clock,
    };

    // 5. 挂起直到外部退出信号
    start_server(state, &config.server.bind_addr(), shutdown_signal()).await?;
    info!("Shutdown complete. Exiting...");

    Ok(())
}

/// # Summary
/// 启动时拉取一次基金家族列表写入缓存。
///
/// # Logic
/// 成功则整体替换缓存；失败只记录警告，缓存保持为空，进程继续启动。
async fn warm_family_cache(funds: &dyn FundDataProvider, cache: &dyn FamilyCache) {
    match funds.list_fund_families().await {
        Ok(families) => {
            info!("Cached {} fund families", families.len());
            cache.replace(families);
        }
        Err(e) => warn!("Failed to fetch fund families: {}", e),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received.");
}
