use chrono::Local;
use log::{LevelFilter, SetLoggerError};
use simple_logger::SimpleLogger;
use std::fs::OpenOptions;
use std::io::Write;

/// 初始化日志系统
///
/// 未开启日志时仍保留警告级别，读取失败等非致命错误始终对用户可见。
pub fn init_logger(enable_log: bool) -> Result<(), SetLoggerError> {
    if enable_log {
        SimpleLogger::new().with_level(LevelFilter::Info).init()
    } else {
        SimpleLogger::new().with_level(LevelFilter::Warn).init()
    }
}

/// 记录搜索结果到日志文件
pub fn log_to_file(message: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(true)
        .open("nse-finder.log")?;

    writeln!(
        file,
        "[{}] {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        message
    )?;
    Ok(())
}
