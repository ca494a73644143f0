//! 日志初始化
//!
//! 终端输出为主；设置日志目录后改写按天滚动的文件，
//! JSON 与否由配置决定。

use std::path::Path;

use tracing_appender::rolling::RollingFileAppender;

/// 以默认配置初始化日志
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// 初始化日志，可选等级 / JSON / 文件目录
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let json = json.unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    match (file_appender(log_dir), json) {
        (Some(writer), true) => builder.json().with_writer(writer).init(),
        (Some(writer), false) => builder.with_writer(writer).init(),
        (None, true) => builder.json().init(),
        (None, false) => builder.init(),
    }
}

/// 目录存在时返回按天滚动的文件写入器
fn file_appender(log_dir: Option<&str>) -> Option<RollingFileAppender> {
    let dir = log_dir?;
    if !Path::new(dir).exists() {
        return None;
    }
    Some(tracing_appender::rolling::daily(dir, "restora-server"))
}
