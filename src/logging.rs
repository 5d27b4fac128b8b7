//! 日志模块
//!
//! 所有日志行带固定 `[WEBHOOK]` 标签，统一经过开关控制：
//! 配置中的 `enable_logging` 为 false 时不产生任何输出。

use tracing_subscriber::EnvFilter;

/// 日志行固定标签
pub const LOG_TAG: &str = "[WEBHOOK]";

/// warning 级别日志（受开关控制）
pub fn log_warn<S: AsRef<str>>(enabled: bool, message: S) {
    if enabled {
        tracing::warn!("{} {}", LOG_TAG, message.as_ref());
    }
}

/// error 级别日志（受开关控制）
pub fn log_error<S: AsRef<str>>(enabled: bool, message: S) {
    if enabled {
        tracing::error!("{} {}", LOG_TAG, message.as_ref());
    }
}

/// 初始化日志系统
///
/// 优先使用环境变量 RUST_LOG，没有则回退到 `default_level`。
/// 重复初始化（例如多个测试）时静默忽略。
pub fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
}
