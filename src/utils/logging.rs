//! 基于 flexi_logger 的文件日志
//!
//! 按大小轮转，异步写入；进程内只保留一个活动句柄

use crate::config::Config;
use crate::core::error::{StatsError, StatsResult};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use parking_lot::Mutex;

static ACTIVE_LOGGER: Mutex<Option<LoggerHandle>> = Mutex::new(None);

/// 初始化日志系统
///
/// 重复初始化返回错误，需先调用 [`shutdown`]
///
/// # Examples
/// ```no_run
/// use graphstats::config::Config;
/// use graphstats::utils::logging;
///
/// let config = Config::default();
/// logging::init(&config).expect("日志初始化失败");
/// ```
pub fn init(config: &Config) -> StatsResult<()> {
    let mut guard = ACTIVE_LOGGER.lock();
    if guard.is_some() {
        return Err(StatsError::Logging("日志系统已初始化".to_string()));
    }

    let handle = Logger::try_with_str(&config.log.level)?
        .log_to_file(
            FileSpec::default()
                .basename(&config.log.file)
                .directory(&config.log.dir),
        )
        .rotate(
            Criterion::Size(config.log.max_file_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.log.max_files),
        )
        .write_mode(WriteMode::Async)
        .append()
        .start()?;

    *guard = Some(handle);

    log::info!("日志系统初始化完成: {}/{}", config.log.dir, config.log.file);
    Ok(())
}

/// 写出缓冲中的记录并释放句柄，未初始化时什么也不做
pub fn shutdown() {
    if let Some(handle) = ACTIVE_LOGGER.lock().take() {
        handle.flush();
        handle.shutdown();
    }
}

pub fn is_initialized() -> bool {
    ACTIVE_LOGGER.lock().is_some()
}
