//! # 日志初始化
//!
//! 控制台输出始终开启；配置了 `logging.dir` 时额外按天滚动写文件。

use navgate_core::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE_PREFIX: &str = "navgate.log";

/// # Summary
/// 安装全局 tracing subscriber。
///
/// # Logic
/// 1. `RUST_LOG` 存在时优先，否则使用配置中的过滤规则。
/// 2. 按需创建非阻塞的文件写入器。
///
/// # Returns
/// 文件写入器的 guard，必须持有到进程退出，否则缓冲日志会丢失。
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))?;

    let (file_layer, guard) = match &config.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
