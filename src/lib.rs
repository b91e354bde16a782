//! HUD Console - 单操作员状态控制台
//!
//! Normal / Alert 状态切换、后台心跳、脚本化诊断扫描，
//! 所有事件写入只追加的文本日志。

pub mod cli;
pub mod config;
pub mod logger;
pub mod monitor;
pub mod presentation;
pub mod scan;
pub mod session;
pub mod status;
pub mod tui;

#[cfg(test)]
mod test_support;

pub use config::{ConsoleConfig, ScanPolicy};
pub use logger::{ErrorLog, EventLogger, LogEntry, RecordedEntry};
pub use monitor::{MonitorHandle, MonitorLoop, HEARTBEAT_MESSAGE};
pub use presentation::{ConsolePresentation, Presentation, PresentationCall, RecordingPresentation, StatusStyle};
pub use scan::{ScanDispatch, ScanHandle, ScanOutcome, ScanSequencer, SCAN_COMPLETE_MESSAGE, SCAN_STEPS};
pub use session::{Session, SystemInfo};
pub use status::{StatusController, SystemStatus};
