//! Info 命令 - 显示平台信息

use anyhow::Result;
use clap::Args;

use crate::cli::{format_output, prepare_log_dirs, ConsoleArgs};
use crate::logger::EventLogger;
use crate::session::{SystemInfo, SYSTEM_INFO_MESSAGE};

/// Info 命令参数
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// 处理 info 命令
pub fn handle_info(args: InfoArgs, console: &ConsoleArgs) -> Result<()> {
    let config = console.resolve()?;
    prepare_log_dirs(&config)?;

    let info = SystemInfo::collect();
    println!(
        "{}",
        format_output(&info, args.json, |i| {
            let mut out = String::from("System Information:");
            for line in i.lines() {
                out.push_str("\n  ");
                out.push_str(&line);
            }
            out
        })
    );
    EventLogger::new(config.log_path).append(SYSTEM_INFO_MESSAGE);
    Ok(())
}
