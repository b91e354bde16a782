//! 进程外层错误边界 - 记录未处理的错误并给出退出码

use anyhow::Result;
use std::future::Future;
use tracing::error;

use crate::logger::ErrorLog;

/// 未处理错误时的进程退出码
pub const FAILURE_EXIT_CODE: i32 = 1;

/// 报告一个未处理的错误：tracing、stderr、错误日志文件，返回退出码
///
/// 错误日志写入失败只打印到 stderr，不改变退出码。
pub fn report_failure(err: &anyhow::Error, error_log: &ErrorLog) -> i32 {
    error!(error = %format!("{err:#}"), "Unrecovered failure");
    eprintln!("❌ {err:#}");
    if let Err(log_err) = error_log.record(err) {
        eprintln!("Failed to write error log: {log_err:#}");
    }
    FAILURE_EXIT_CODE
}

/// 运行命令，失败时经 [`report_failure`] 报告；成功返回 0
pub async fn run_reported<F>(command: F, error_log: &ErrorLog) -> i32
where
    F: Future<Output = Result<()>>,
{
    match command.await {
        Ok(()) => 0,
        Err(e) => report_failure(&e, error_log),
    }
}
