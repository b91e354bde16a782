//! 配置模块 - 加载 ~/.config/hud-console/config.json 与环境变量覆盖

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// 扫描调度策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanPolicy {
    /// 允许多次扫描并行（输出交错）
    #[default]
    Overlap,
    /// 已有扫描进行中时拒绝新的扫描
    Exclusive,
}

/// 控制台配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// 事件日志文件
    pub log_path: PathBuf,
    /// 启动失败日志文件
    pub error_log_path: PathBuf,
    /// 心跳间隔（秒）
    pub monitor_interval_secs: u64,
    /// 每个扫描步骤前的等待（毫秒）
    pub scan_step_delay_ms: u64,
    /// 完成消息前的等待（毫秒）
    pub scan_final_delay_ms: u64,
    pub scan_policy: ScanPolicy,
    /// 活动流最多保留的行数
    pub feed_capacity: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let dir = config_dir();
        Self {
            log_path: dir.join("events.log"),
            error_log_path: dir.join("error_log.txt"),
            monitor_interval_secs: 60,
            scan_step_delay_ms: 500,
            scan_final_delay_ms: 1000,
            scan_policy: ScanPolicy::Overlap,
            feed_capacity: 1000,
        }
    }
}

/// 配置目录
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config/hud-console")
}

/// 默认配置文件路径
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

impl ConsoleConfig {
    /// 按 默认值 -> 配置文件 -> 环境变量 的顺序加载
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件读取，缺失字段取默认值
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        debug!(path = %path.display(), "Loaded console config");
        Ok(config)
    }

    /// 环境变量覆盖
    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("HUD_LOG_FILE") {
            if !path.is_empty() {
                self.log_path = PathBuf::from(path);
            }
        }
        if let Ok(secs) = std::env::var("HUD_MONITOR_INTERVAL_SECS") {
            self.monitor_interval_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("HUD_MONITOR_INTERVAL_SECS is not a number: {secs}"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.monitor_interval_secs == 0 {
            bail!("monitor_interval_secs must be greater than zero");
        }
        if self.feed_capacity == 0 {
            bail!("feed_capacity must be greater than zero");
        }
        Ok(())
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.monitor_interval_secs)
    }

    pub fn scan_step_delay(&self) -> Duration {
        Duration::from_millis(self.scan_step_delay_ms)
    }

    pub fn scan_final_delay(&self) -> Duration {
        Duration::from_millis(self.scan_final_delay_ms)
    }

    /// 写回 JSON 文件（setup 命令使用）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        // 临时文件 + rename 保证原子写入
        let temp = path.with_extension("tmp");
        fs::write(&temp, content)?;
        fs::rename(&temp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.monitor_interval(), Duration::from_secs(60));
        assert_eq!(config.scan_step_delay(), Duration::from_millis(500));
        assert_eq!(config.scan_final_delay(), Duration::from_secs(1));
        assert_eq!(config.scan_policy, ScanPolicy::Overlap);
        assert!(config.log_path.ends_with("events.log"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"monitor_interval_secs": 5, "scan_policy": "exclusive"}"#).unwrap();

        let config = ConsoleConfig::from_file(&path).unwrap();
        assert_eq!(config.monitor_interval_secs, 5);
        assert_eq!(config.scan_policy, ScanPolicy::Exclusive);
        assert_eq!(config.scan_step_delay_ms, 500);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        let err = ConsoleConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = ConsoleConfig {
            monitor_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.json");
        let config = ConsoleConfig {
            log_path: dir.path().join("events.log"),
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ConsoleConfig::from_file(&path).unwrap(), config);
    }
}
