//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 初始化全局日志订阅者
///
/// 默认级别 `info`，可通过 `RUST_LOG` 覆盖；`verbose` 为真时默认级别提升为 `debug`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（如测试中）直接忽略
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
