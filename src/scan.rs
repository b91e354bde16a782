//! 诊断扫描 - 按固定顺序、固定间隔输出扫描步骤

use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::ScanPolicy;
use crate::logger::EventLogger;
use crate::presentation::Presentation;

/// 扫描步骤（只读常量，所有扫描共享）
pub const SCAN_STEPS: [&str; 7] = [
    "Initializing scan...",
    "Checking system integrity...",
    "Scanning memory subsystems...",
    "Analyzing network connections...",
    "Verifying security protocols...",
    "Checking for updates...",
    "Finalizing scan results...",
];

/// 完成消息
pub const SCAN_COMPLETE_MESSAGE: &str = "Scan complete. No threats detected.";

/// 派发时推送到活动流（不写入事件日志）
pub const SCAN_STARTED_LINE: &str = "Running system scan...";

/// 独占模式下拒绝时推送到活动流
pub const SCAN_BUSY_LINE: &str = "Scan already in progress";

/// 一次扫描写入的事件条数
pub const SCAN_ENTRY_COUNT: usize = SCAN_STEPS.len() + 1;

/// 扫描结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Completed,
    Cancelled,
}

/// run() 的派发结果
#[derive(Debug)]
pub enum ScanDispatch {
    Started(ScanHandle),
    /// 独占模式下已有扫描进行中
    Rejected,
}

impl ScanDispatch {
    pub fn is_started(&self) -> bool {
        matches!(self, ScanDispatch::Started(_))
    }

    pub fn into_handle(self) -> Option<ScanHandle> {
        match self {
            ScanDispatch::Started(handle) => Some(handle),
            ScanDispatch::Rejected => None,
        }
    }
}

/// 单次扫描的句柄
///
/// 句柄可以直接丢弃，扫描失败由监督任务记录。
#[derive(Debug)]
pub struct ScanHandle {
    id: u64,
    task: JoinHandle<Result<ScanOutcome>>,
}

impl ScanHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// 等待扫描结束；扫描失败或 panic 时返回错误
    pub async fn join(self) -> Result<ScanOutcome> {
        let id = self.id;
        self.task
            .await
            .map_err(|e| anyhow!("scan run {id} supervisor aborted: {e}"))?
    }
}

/// 扫描调度器
pub struct ScanSequencer {
    logger: Arc<EventLogger>,
    presentation: Arc<dyn Presentation>,
    step_delay: Duration,
    final_delay: Duration,
    policy: ScanPolicy,
    active: Arc<AtomicUsize>,
    next_id: AtomicU64,
    cancel: CancellationToken,
}

impl ScanSequencer {
    pub fn new(logger: Arc<EventLogger>, presentation: Arc<dyn Presentation>) -> Self {
        Self {
            logger,
            presentation,
            step_delay: Duration::from_millis(500),
            final_delay: Duration::from_secs(1),
            policy: ScanPolicy::Overlap,
            active: Arc::new(AtomicUsize::new(0)),
            next_id: AtomicU64::new(1),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_delays(mut self, step_delay: Duration, final_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self.final_delay = final_delay;
        self
    }

    pub fn with_policy(mut self, policy: ScanPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 取消令牌，取消后所有进行中的扫描在下一个等待点结束
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn policy(&self) -> ScanPolicy {
        self.policy
    }

    /// 进行中的扫描数
    pub fn active_runs(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// 派发一次扫描并立即返回，必须在 tokio runtime 内调用
    pub fn run(&self) -> ScanDispatch {
        let guard = match self.policy {
            ScanPolicy::Overlap => ActiveGuard::enter(&self.active),
            ScanPolicy::Exclusive => match ActiveGuard::try_enter_exclusive(&self.active) {
                Some(guard) => guard,
                None => {
                    warn!("System scan rejected, another scan is in progress");
                    self.presentation.append_log_line(SCAN_BUSY_LINE);
                    return ScanDispatch::Rejected;
                }
            },
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        info!(run = id, "System scan dispatched");
        self.presentation.append_log_line(SCAN_STARTED_LINE);

        let worker = ScanWorker {
            id,
            logger: self.logger.clone(),
            presentation: self.presentation.clone(),
            step_delay: self.step_delay,
            final_delay: self.final_delay,
            cancel: self.cancel.clone(),
        };
        let worker_task = tokio::spawn(async move {
            let _guard = guard;
            worker.run().await
        });
        let task = tokio::spawn(supervise(id, worker_task));

        ScanDispatch::Started(ScanHandle { id, task })
    }
}

/// 等待扫描任务结束，失败和 panic 在这里统一记录
async fn supervise(id: u64, worker: JoinHandle<Result<ScanOutcome>>) -> Result<ScanOutcome> {
    match worker.await {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(e)) => {
            error!(run = id, error = %format!("{e:#}"), "System scan worker failed");
            Err(e)
        }
        Err(e) => {
            error!(run = id, error = %e, "System scan worker failed");
            Err(anyhow!("scan run {id} failed: {e}"))
        }
    }
}

/// 单次扫描的执行体
struct ScanWorker {
    id: u64,
    logger: Arc<EventLogger>,
    presentation: Arc<dyn Presentation>,
    step_delay: Duration,
    final_delay: Duration,
    cancel: CancellationToken,
}

impl ScanWorker {
    async fn run(self) -> Result<ScanOutcome> {
        for step in SCAN_STEPS {
            if !self.wait(self.step_delay).await {
                return Ok(self.cancelled());
            }
            self.emit(step);
        }

        if !self.wait(self.final_delay).await {
            return Ok(self.cancelled());
        }
        self.emit(SCAN_COMPLETE_MESSAGE);
        info!(run = self.id, "System scan completed");
        Ok(ScanOutcome::Completed)
    }

    /// 等待指定时长，被取消时返回 false
    async fn wait(&self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = sleep(delay) => true,
        }
    }

    fn emit(&self, message: &str) {
        let entry = self.logger.append(message);
        self.presentation.append_log_line(&entry.message);
    }

    fn cancelled(&self) -> ScanOutcome {
        info!(run = self.id, "System scan cancelled");
        ScanOutcome::Cancelled
    }
}

/// 进行中计数，Drop 时释放（包括 panic 展开）
struct ActiveGuard {
    active: Arc<AtomicUsize>,
}

impl ActiveGuard {
    fn enter(active: &Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        Self {
            active: active.clone(),
        }
    }

    fn try_enter_exclusive(active: &Arc<AtomicUsize>) -> Option<Self> {
        active
            .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self {
                active: active.clone(),
            })
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
