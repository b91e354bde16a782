//! Session - 进程级聚合，持有状态控制器、扫描调度器与监控任务

use serde::Serialize;
use std::sync::Arc;
use sysinfo::{CpuRefreshKind, RefreshKind, System};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::ConsoleConfig;
use crate::logger::EventLogger;
use crate::monitor::{MonitorHandle, MonitorLoop};
use crate::presentation::Presentation;
use crate::scan::{ScanDispatch, ScanSequencer};
use crate::status::{StatusController, SystemStatus};

/// 启动时写入的事件
pub const STARTUP_MESSAGE: &str = "UI System started";

/// 系统信息展示后写入的事件
pub const SYSTEM_INFO_MESSAGE: &str = "System info displayed";

/// 平台信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub os: String,
    pub kernel: String,
    pub processor: String,
    pub console_version: String,
}

impl SystemInfo {
    /// 读取当前平台信息
    pub fn collect() -> Self {
        let os = format!(
            "{} {}",
            System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
            System::os_version().unwrap_or_default()
        );
        let sys = System::new_with_specifics(
            RefreshKind::new().with_cpu(CpuRefreshKind::new()),
        );
        let processor = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| std::env::consts::ARCH.to_string());

        Self {
            os: os.trim().to_string(),
            kernel: System::kernel_version().unwrap_or_else(|| "unknown".to_string()),
            processor,
            console_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 活动流中的展示行
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("OS: {}", self.os),
            format!("Kernel: {}", self.kernel),
            format!("Processor: {}", self.processor),
            format!("Console: v{}", self.console_version),
        ]
    }
}

/// 进程级会话
///
/// 必须在 tokio runtime 内创建。监控任务随会话启动，
/// 默认运行到进程退出；`shutdown` 用于有序退出和测试收尾。
pub struct Session {
    config: ConsoleConfig,
    logger: Arc<EventLogger>,
    presentation: Arc<dyn Presentation>,
    status: StatusController,
    scanner: ScanSequencer,
    monitor: Option<MonitorHandle>,
    cancel: CancellationToken,
}

impl Session {
    pub fn start(config: ConsoleConfig, presentation: Arc<dyn Presentation>) -> Self {
        let cancel = CancellationToken::new();
        let logger = Arc::new(EventLogger::new(config.log_path.clone()));

        let status = StatusController::new(logger.clone(), presentation.clone());
        let scanner = ScanSequencer::new(logger.clone(), presentation.clone())
            .with_delays(config.scan_step_delay(), config.scan_final_delay())
            .with_policy(config.scan_policy)
            .with_cancel_token(cancel.child_token());

        logger.append(STARTUP_MESSAGE);
        info!(log_path = %config.log_path.display(), "Session started");

        let monitor = MonitorLoop::new(
            config.monitor_interval(),
            logger.clone(),
            presentation.clone(),
        )
        .spawn(cancel.child_token());

        Self {
            config,
            logger,
            presentation,
            status,
            scanner,
            monitor: Some(monitor),
            cancel,
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn logger(&self) -> &EventLogger {
        &self.logger
    }

    pub fn status(&self) -> SystemStatus {
        self.status.current()
    }

    /// 切换 Normal / Alert
    pub fn toggle_alert(&self) -> SystemStatus {
        self.status.toggle()
    }

    /// 派发一次诊断扫描
    pub fn start_scan(&self) -> ScanDispatch {
        self.scanner.run()
    }

    pub fn active_scans(&self) -> usize {
        self.scanner.active_runs()
    }

    /// 展示平台信息并记录事件
    pub fn system_info(&self) -> SystemInfo {
        let info = SystemInfo::collect();
        self.presentation.append_log_line("System Information:");
        for line in info.lines() {
            self.presentation.append_log_line(&line);
        }
        self.logger.append(SYSTEM_INFO_MESSAGE);
        info
    }

    /// 会话级取消令牌，监控与扫描都挂在它的子令牌上
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// 取消所有后台任务并等待监控任务结束
    pub async fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(monitor) = self.monitor.take() {
            monitor.stop().await;
        }
        info!("Session shut down");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
