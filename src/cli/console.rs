//! 控制台公共参数 - 配置解析与日志目录准备

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use crate::config::ConsoleConfig;

/// 各命令共享的配置参数
#[derive(Args, Debug, Clone, Default)]
pub struct ConsoleArgs {
    /// 配置文件路径 (默认: ~/.config/hud-console/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// 事件日志文件
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
    /// 心跳间隔（秒）
    #[arg(long, global = true)]
    pub monitor_interval: Option<u64>,
}

impl ConsoleArgs {
    /// 配置文件 -> 环境变量 -> 命令行参数
    pub fn resolve(&self) -> Result<ConsoleConfig> {
        let mut config = ConsoleConfig::load(self.config.as_deref())?;
        if let Some(ref path) = self.log_file {
            config.log_path = path.clone();
        }
        if let Some(secs) = self.monitor_interval {
            config.monitor_interval_secs = secs;
        }
        config.validate()?;
        Ok(config)
    }

    /// 启动失败时使用的错误日志路径，配置不可用时回退到默认值
    pub fn error_log_path(&self) -> PathBuf {
        self.resolve()
            .map(|c| c.error_log_path)
            .unwrap_or_else(|_| ConsoleConfig::default().error_log_path)
    }
}

/// 确保事件日志与错误日志所在目录存在
pub fn prepare_log_dirs(config: &ConsoleConfig) -> Result<()> {
    for path in [&config.log_path, &config.error_log_path] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}
