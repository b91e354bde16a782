//! TUI 应用状态和主循环

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::PoisonError;
use std::time::Duration;
use tracing::debug;

use crate::session::Session;
use crate::tui::{handle_key, poll_event, render, SharedFeed, TuiEvent};

pub type AppResult<T> = Result<T>;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// TUI 应用状态
pub struct App {
    pub session: Session,
    pub feed: SharedFeed,
    /// 是否退出
    pub should_quit: bool,
    /// 距离底部的滚动行数，0 表示跟随最新
    pub scroll_offset: usize,
}

impl App {
    pub fn new(session: Session, feed: SharedFeed) -> Self {
        Self {
            session,
            feed,
            should_quit: false,
            scroll_offset: 0,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn toggle_alert(&mut self) {
        self.session.toggle_alert();
    }

    pub fn start_scan(&mut self) {
        // 扫描在后台运行，失败由监督任务记录，句柄不需要保留
        let _ = self.session.start_scan();
        self.follow_tail();
    }

    pub fn show_system_info(&mut self) {
        self.session.system_info();
        self.follow_tail();
    }

    pub fn scroll_up(&mut self) {
        let max = self.feed_len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + 1).min(max);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn follow_tail(&mut self) {
        self.scroll_offset = 0;
    }

    fn feed_len(&self) -> usize {
        self.feed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .lines
            .len()
    }
}

/// 进入 raw mode 与备用屏幕
pub fn init_terminal() -> AppResult<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

/// 恢复终端
pub fn restore_terminal(terminal: &mut Tui) -> AppResult<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// 主循环：绘制 -> 等待按键或刷新 -> 处理
pub fn run(terminal: &mut Tui, app: &mut App, refresh_interval_ms: u64) -> AppResult<()> {
    let timeout = Duration::from_millis(refresh_interval_ms.max(50));
    while !app.should_quit {
        terminal.draw(|frame| render(app, frame))?;

        match poll_event(timeout)? {
            Some(TuiEvent::Key(key)) => handle_key(app, key),
            Some(TuiEvent::Tick) | None => {}
        }
    }
    debug!("TUI loop exited");
    Ok(())
}
