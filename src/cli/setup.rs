//! Setup 命令 - 交互式生成 config.json 并创建日志目录

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{Confirm, Input, Select};
use std::path::{Path, PathBuf};

use crate::cli::{prepare_log_dirs, ConsoleArgs};
use crate::config::{config_path, ConsoleConfig, ScanPolicy};

/// Setup 命令参数
#[derive(Args, Debug, Default)]
pub struct SetupArgs {
    /// 使用默认值，跳过交互式提示
    #[arg(long)]
    pub auto: bool,
}

/// 处理 setup 命令
pub fn handle_setup(args: SetupArgs, console: &ConsoleArgs) -> Result<()> {
    let path = console.config.clone().unwrap_or_else(config_path);
    println!("HUD Console Setup\n");

    let existing = if path.exists() {
        println!("检测到已有配置: {}", path.display());
        if !args.auto {
            let overwrite = Confirm::new()
                .with_prompt("是否覆盖现有配置？（会保留未修改的字段）")
                .default(false)
                .interact()
                .unwrap_or(false);
            if !overwrite {
                println!("已取消。");
                return Ok(());
            }
        }
        ConsoleConfig::from_file(&path)?
    } else {
        ConsoleConfig::default()
    };

    let config = if args.auto {
        existing
    } else {
        prompt_config(existing)?
    };
    config.validate()?;

    prepare_log_dirs(&config)?;
    config.save(&path)?;

    print_summary(&path, &config);
    Ok(())
}

fn prompt_config(mut config: ConsoleConfig) -> Result<ConsoleConfig> {
    let log_path: String = Input::new()
        .with_prompt("Event log file")
        .default(config.log_path.display().to_string())
        .interact_text()
        .context("读取日志路径失败")?;
    config.log_path = PathBuf::from(log_path);

    config.monitor_interval_secs = Input::new()
        .with_prompt("Heartbeat interval (seconds)")
        .default(config.monitor_interval_secs)
        .validate_with(|v: &u64| if *v > 0 { Ok(()) } else { Err("must be greater than zero") })
        .interact_text()
        .context("读取心跳间隔失败")?;

    let policies = [ScanPolicy::Overlap, ScanPolicy::Exclusive];
    let labels = [
        "overlap   - every request starts a new scan",
        "exclusive - ignore requests while a scan is running",
    ];
    let current = policies.iter().position(|p| *p == config.scan_policy).unwrap_or(0);
    let choice = Select::new()
        .with_prompt("Scan policy")
        .items(&labels)
        .default(current)
        .interact()
        .context("读取扫描策略失败")?;
    config.scan_policy = policies[choice];

    println!();
    Ok(config)
}

fn print_summary(path: &Path, config: &ConsoleConfig) {
    println!("配置已写入: {}", path.display());
    println!("\n── 下一步 ──\n");
    println!("  事件日志:   {}", config.log_path.display());
    println!("  错误日志:   {}", config.error_log_path.display());
    println!("  启动控制台: hud");
    println!("  查看事件:   hud logs -n 20");
    println!();
}
