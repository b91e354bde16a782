//! 状态控制 - Normal / Alert 二值状态及切换

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

use crate::logger::{EventLogger, LogEntry};
use crate::presentation::{Presentation, StatusStyle};

/// 系统状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SystemStatus {
    #[default]
    Normal,
    Alert,
}

impl SystemStatus {
    pub fn toggled(self) -> Self {
        match self {
            SystemStatus::Normal => SystemStatus::Alert,
            SystemStatus::Alert => SystemStatus::Normal,
        }
    }

    /// 状态栏文字
    pub fn label(self) -> &'static str {
        match self {
            SystemStatus::Normal => "Normal",
            SystemStatus::Alert => "Alert Mode",
        }
    }

    pub fn style(self) -> StatusStyle {
        match self {
            SystemStatus::Normal => StatusStyle::Nominal,
            SystemStatus::Alert => StatusStyle::Alert,
        }
    }

    /// 进入该状态时记录的事件
    pub fn transition_message(self) -> &'static str {
        match self {
            SystemStatus::Normal => "Alert mode deactivated",
            SystemStatus::Alert => "Alert mode activated",
        }
    }
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SystemStatus::Normal => "Normal",
            SystemStatus::Alert => "Alert",
        })
    }
}

/// 状态控制器，独占持有 SystemStatus
pub struct StatusController {
    status: Mutex<SystemStatus>,
    logger: Arc<EventLogger>,
    presentation: Arc<dyn Presentation>,
}

impl StatusController {
    pub fn new(logger: Arc<EventLogger>, presentation: Arc<dyn Presentation>) -> Self {
        Self {
            status: Mutex::new(SystemStatus::Normal),
            logger,
            presentation,
        }
    }

    pub fn current(&self) -> SystemStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 切换状态并返回新状态
    ///
    /// 整个切换在锁内完成：先写日志，再更新显示，最后提交新状态，
    /// 两次切换不会交错。
    pub fn toggle(&self) -> SystemStatus {
        let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);
        let next = status.toggled();

        let entry: LogEntry = self.logger.append(next.transition_message());
        self.presentation.set_status(next.label(), next.style());
        self.presentation.append_log_line(&entry.message);

        *status = next;
        info!(status = %next, "System status changed");
        next
    }
}

impl fmt::Debug for StatusController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusController")
            .field("status", &self.current())
            .field("log_path", &self.logger.path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::RecordingPresentation;
    use tempfile::TempDir;

    fn controller(dir: &TempDir) -> (StatusController, Arc<RecordingPresentation>) {
        let presentation = Arc::new(RecordingPresentation::new());
        let logger = Arc::new(EventLogger::new(dir.path().join("events.log")));
        (StatusController::new(logger, presentation.clone()), presentation)
    }

    #[test]
    fn test_toggle_alternates() {
        let dir = TempDir::new().unwrap();
        let (ctl, _) = controller(&dir);

        assert_eq!(ctl.current(), SystemStatus::Normal);
        let seq: Vec<_> = (0..5).map(|_| ctl.toggle()).collect();
        assert_eq!(
            seq,
            vec![
                SystemStatus::Alert,
                SystemStatus::Normal,
                SystemStatus::Alert,
                SystemStatus::Normal,
                SystemStatus::Alert,
            ]
        );
    }

    #[test]
    fn test_toggle_updates_presentation() {
        let dir = TempDir::new().unwrap();
        let (ctl, presentation) = controller(&dir);

        ctl.toggle();
        assert_eq!(
            presentation.last_status(),
            Some(("Alert Mode".to_string(), StatusStyle::Alert))
        );
        assert_eq!(presentation.lines(), vec!["Alert mode activated"]);

        ctl.toggle();
        assert_eq!(
            presentation.last_status(),
            Some(("Normal".to_string(), StatusStyle::Nominal))
        );
    }

    #[test]
    fn test_toggle_survives_log_failure() {
        let dir = TempDir::new().unwrap();
        let presentation = Arc::new(RecordingPresentation::new());
        let logger = Arc::new(EventLogger::new(dir.path().join("missing/events.log")));
        let ctl = StatusController::new(logger, presentation.clone());

        assert_eq!(ctl.toggle(), SystemStatus::Alert);
        assert_eq!(ctl.current(), SystemStatus::Alert);
        assert_eq!(presentation.lines(), vec!["Alert mode activated"]);
    }

    #[test]
    fn test_concurrent_toggles_do_not_interleave() {
        let dir = TempDir::new().unwrap();
        let (ctl, _) = controller(&dir);
        let ctl = Arc::new(ctl);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ctl = ctl.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        ctl.toggle();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // 100 次切换后回到 Normal，日志严格交替
        assert_eq!(ctl.current(), SystemStatus::Normal);
        let content = std::fs::read_to_string(dir.path().join("events.log")).unwrap();
        let messages: Vec<String> = content
            .lines()
            .filter_map(LogEntry::parse)
            .map(|e| e.message)
            .collect();
        assert_eq!(messages.len(), 100);
        for (i, m) in messages.iter().enumerate() {
            let expected = if i % 2 == 0 {
                "Alert mode activated"
            } else {
                "Alert mode deactivated"
            };
            assert_eq!(m, expected);
        }
    }
}
