// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 支持环境变量配置日志级别；致命错误额外落盘 logs/error.log
// ==========================================

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info，verbose 时默认: debug）
///   例如: RUST_LOG=debug 或 RUST_LOG=venue_shift_aps=trace
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// 将一条致命错误追加到错误日志
///
/// 外层调度器只看 logs/error.log；目录不存在时按需创建，
/// 单条错误占一行
pub fn append_error_log(log_dir: &Path, message: &str) -> io::Result<()> {
    fs::create_dir_all(log_dir)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("error.log"))?;
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(file, "{timestamp} ERROR: {message}")
}
