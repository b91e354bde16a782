//! Logs 命令 - 读取事件日志尾部

use anyhow::Result;
use clap::Args;

use crate::cli::{format_output, ConsoleArgs};
use crate::logger::EventLogger;

/// Logs 命令参数
#[derive(Args, Debug)]
pub struct LogsArgs {
    /// 显示最近 N 条事件
    #[arg(long, short = 'n', default_value = "20")]
    pub lines: usize,
    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// 处理 logs 命令
pub fn handle_logs(args: LogsArgs, console: &ConsoleArgs) -> Result<()> {
    let config = console.resolve()?;
    let logger = EventLogger::new(config.log_path);
    let entries = logger.read_recent(args.lines)?;

    if entries.is_empty() && !args.json {
        println!("No events recorded in {}", logger.path().display());
        return Ok(());
    }

    println!(
        "{}",
        format_output(&entries, args.json, |entries| {
            entries
                .iter()
                .map(|e| format!("[{}] {}", e.time.format("%H:%M:%S"), e.message))
                .collect::<Vec<_>>()
                .join("\n")
        })
    );
    Ok(())
}
