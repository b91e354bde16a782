//! Presentation 接口 - 核心只向显示层单向推送状态与活动流

use chrono::Local;
use std::sync::Mutex;

/// 状态文字的显示风格
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStyle {
    /// 绿色
    Nominal,
    /// 橙色
    Alert,
}

/// 显示层接口
///
/// 核心从不读回显示层状态；实现自身的失败不属于核心的错误模型。
pub trait Presentation: Send + Sync {
    /// 更新状态文字
    fn set_status(&self, text: &str, style: StatusStyle);

    /// 向活动流追加一行
    fn append_log_line(&self, text: &str);
}

/// 活动流行格式 `[HH:MM:SS] text`
pub fn feed_line(text: &str) -> String {
    format!("[{}] {}", Local::now().format("%H:%M:%S"), text)
}

/// 控制台输出（无界面模式）
#[derive(Debug, Default)]
pub struct ConsolePresentation;

impl ConsolePresentation {
    pub fn new() -> Self {
        Self
    }
}

impl Presentation for ConsolePresentation {
    fn set_status(&self, text: &str, _style: StatusStyle) {
        println!("SYSTEM STATUS: {}", text);
    }

    fn append_log_line(&self, text: &str) {
        println!("{}", feed_line(text));
    }
}

/// 记录到的一次显示调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationCall {
    Status { text: String, style: StatusStyle },
    Line(String),
}

/// 记录所有调用的显示层（测试与嵌入使用）
#[derive(Debug, Default)]
pub struct RecordingPresentation {
    calls: Mutex<Vec<PresentationCall>>,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PresentationCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// 只取活动流文本
    pub fn lines(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PresentationCall::Line(line) => Some(line),
                PresentationCall::Status { .. } => None,
            })
            .collect()
    }

    /// 最近一次状态更新
    pub fn last_status(&self) -> Option<(String, StatusStyle)> {
        self.calls().into_iter().rev().find_map(|c| match c {
            PresentationCall::Status { text, style } => Some((text, style)),
            PresentationCall::Line(_) => None,
        })
    }

    fn push(&self, call: PresentationCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Presentation for RecordingPresentation {
    fn set_status(&self, text: &str, style: StatusStyle) {
        self.push(PresentationCall::Status {
            text: text.to_string(),
            style,
        });
    }

    fn append_log_line(&self, text: &str) {
        self.push(PresentationCall::Line(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_presentation() {
        let p = RecordingPresentation::new();
        p.append_log_line("one");
        p.set_status("Alert Mode", StatusStyle::Alert);
        p.append_log_line("two");

        assert_eq!(p.lines(), vec!["one", "two"]);
        assert_eq!(
            p.last_status(),
            Some(("Alert Mode".to_string(), StatusStyle::Alert))
        );
        assert_eq!(p.calls().len(), 3);
    }

    #[test]
    fn test_feed_line_format() {
        let line = feed_line("System initialized...");
        assert_eq!(line.len(), "[00:00:00] System initialized...".len());
        assert!(line.ends_with("] System initialized..."));
    }
}
