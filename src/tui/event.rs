//! 事件处理模块

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::tui::App;

/// TUI 事件
#[derive(Debug)]
pub enum TuiEvent {
    Key(KeyEvent),
    Tick,
}

/// 轮询事件
pub fn poll_event(timeout: Duration) -> Result<Option<TuiEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            // Windows 上按键会同时产生 Press 与 Release
            if key.kind == KeyEventKind::Press {
                return Ok(Some(TuiEvent::Key(key)));
            }
        }
        return Ok(None);
    }
    Ok(Some(TuiEvent::Tick))
}

/// 处理按键事件
pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('a') => app.toggle_alert(),
        KeyCode::Char('s') => app.start_scan(),
        KeyCode::Char('i') => app.show_system_info(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('G') | KeyCode::End => app.follow_tail(),
        _ => {}
    }
}
