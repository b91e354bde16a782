//! 后台监控 - 固定间隔输出心跳事件

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;
use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::logger::EventLogger;
use crate::presentation::Presentation;

/// 心跳消息
pub const HEARTBEAT_MESSAGE: &str = "System monitoring active. All systems nominal.";

/// 心跳循环
///
/// 第一次心跳在启动后一个间隔触发（T=0 不触发），
/// 运行时长 D 内恰好产生 floor(D / interval) 次心跳，D 端点包含在内。
pub struct MonitorLoop {
    interval: Duration,
    logger: Arc<EventLogger>,
    presentation: Arc<dyn Presentation>,
}

impl MonitorLoop {
    pub fn new(
        interval: Duration,
        logger: Arc<EventLogger>,
        presentation: Arc<dyn Presentation>,
    ) -> Self {
        Self {
            interval,
            logger,
            presentation,
        }
    }

    /// 在当前 tokio runtime 中启动，返回可停止的句柄
    ///
    /// 心跳任务由监督任务等待，任务失败或 panic 时立即记录 `error!`。
    pub fn spawn(self, cancel: CancellationToken) -> MonitorHandle {
        let worker = tokio::spawn(self.run(cancel.clone()));
        let task = tokio::spawn(async move {
            match worker.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(error = %format!("{e:#}"), "System monitor failed"),
                Err(e) => error!(error = %e, "System monitor failed"),
            }
        });
        MonitorHandle { cancel, task }
    }

    async fn run(self, cancel: CancellationToken) -> Result<()> {
        info!(interval_secs = self.interval.as_secs(), "System monitor started");

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("System monitor stopped");
                    return Ok(());
                }
                _ = ticker.tick() => self.heartbeat(),
            }
        }
    }

    fn heartbeat(&self) {
        let entry = self.logger.append(HEARTBEAT_MESSAGE);
        self.presentation.append_log_line(&entry.message);
        debug!("Heartbeat emitted");
    }
}

/// 监控任务句柄
#[derive(Debug)]
pub struct MonitorHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// 取消并等待任务结束
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "System monitor task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
