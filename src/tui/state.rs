//! TUI 状态数据结构 - 由 FeedPresentation 写入、渲染层读取

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::presentation::{feed_line, Presentation, StatusStyle};
use crate::status::SystemStatus;

/// 活动流初始行
pub const FEED_INITIAL_LINE: &str = "System initialized...";

/// 显示状态
#[derive(Debug, Clone)]
pub struct FeedState {
    pub status_text: String,
    pub status_style: StatusStyle,
    pub lines: VecDeque<String>,
    capacity: usize,
}

impl FeedState {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut lines = VecDeque::with_capacity(capacity.min(1024));
        lines.push_back(FEED_INITIAL_LINE.to_string());
        Self {
            status_text: SystemStatus::Normal.label().to_string(),
            status_style: StatusStyle::Nominal,
            lines,
            capacity,
        }
    }

    /// 追加一行，超出容量时丢弃最旧的行
    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }
}

pub type SharedFeed = Arc<Mutex<FeedState>>;

/// TUI 的 Presentation 实现
#[derive(Debug, Clone)]
pub struct FeedPresentation {
    feed: SharedFeed,
}

impl FeedPresentation {
    pub fn new(capacity: usize) -> Self {
        Self {
            feed: Arc::new(Mutex::new(FeedState::new(capacity))),
        }
    }

    pub fn feed(&self) -> SharedFeed {
        self.feed.clone()
    }
}

impl Presentation for FeedPresentation {
    fn set_status(&self, text: &str, style: StatusStyle) {
        let mut feed = self.feed.lock().unwrap_or_else(PoisonError::into_inner);
        feed.status_text = text.to_string();
        feed.status_style = style;
    }

    fn append_log_line(&self, text: &str) {
        let line = feed_line(text);
        self.feed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }
}
