//! Scan 命令 - 无界面运行一次诊断扫描

use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;

use crate::cli::{prepare_log_dirs, ConsoleArgs};
use crate::logger::EventLogger;
use crate::presentation::ConsolePresentation;
use crate::scan::{ScanOutcome, ScanSequencer};

/// Scan 命令参数
#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// 覆盖步骤间隔（毫秒）
    #[arg(long)]
    pub step_delay_ms: Option<u64>,
}

/// 处理 scan 命令，等待扫描结束
pub async fn handle_scan(args: ScanArgs, console: &ConsoleArgs) -> Result<ScanOutcome> {
    let mut config = console.resolve()?;
    if let Some(ms) = args.step_delay_ms {
        config.scan_step_delay_ms = ms;
    }
    prepare_log_dirs(&config)?;

    let logger = Arc::new(EventLogger::new(config.log_path.clone()));
    let scanner = ScanSequencer::new(logger, Arc::new(ConsolePresentation::new()))
        .with_delays(config.scan_step_delay(), config.scan_final_delay());

    let handle = scanner
        .run()
        .into_handle()
        .context("System scan was rejected")?;
    handle.join().await
}
