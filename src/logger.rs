//! tracing 订阅器初始化

use tracing_subscriber::EnvFilter;

/// 初始化日志输出
///
/// 优先使用 `RUST_LOG`；没有设置时默认 `info`，`verbose` 为真时默认 `debug`。
/// 重复调用是安全的。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
