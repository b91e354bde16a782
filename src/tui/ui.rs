//! TUI 渲染模块

use crate::presentation::StatusStyle;
use crate::status::SystemStatus;
use crate::tui::App;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use std::sync::PoisonError;

const BACKGROUND: Color = Color::Rgb(0x1e, 0x1e, 0x1e);
const PANEL: Color = Color::Rgb(0x2d, 0x2d, 0x2d);
const ACCENT: Color = Color::Rgb(0x00, 0xa8, 0xff);
const MUTED: Color = Color::Rgb(0xaa, 0xaa, 0xaa);
const NOMINAL: Color = Color::Rgb(0x00, 0xff, 0x00);
const ALERT: Color = Color::Rgb(0xff, 0x95, 0x00);
const CALM: Color = Color::Rgb(0x34, 0xc7, 0x59);
const SCAN: Color = Color::Rgb(0x00, 0x7a, 0xff);
const INFO: Color = Color::Rgb(0x58, 0x56, 0xd6);

/// 渲染主界面
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(BACKGROUND)), area);

    // 垂直分割: 标题 | 状态 | 控制区 | 活动流 | 底部栏
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, vertical[0]);
    render_status(app, frame, vertical[1]);
    render_controls(app, frame, vertical[2]);
    render_feed(app, frame, vertical[3]);

    let footer = Paragraph::new(format!("Jarvis AI v{} ", env!("CARGO_PKG_VERSION")))
        .alignment(Alignment::Right)
        .style(Style::default().fg(MUTED).bg(BACKGROUND));
    frame.render_widget(footer, vertical[4]);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            " J.A.R.V.I.S.",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   Advanced AI Assistant", Style::default().fg(MUTED)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let (text, style) = {
        let feed = app.feed.lock().unwrap_or_else(PoisonError::into_inner);
        (feed.status_text.clone(), feed.status_style)
    };
    let color = match style {
        StatusStyle::Nominal => NOMINAL,
        StatusStyle::Alert => ALERT,
    };

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let status = Line::from(vec![
        Span::styled(
            " SYSTEM STATUS: ",
            Style::default().fg(MUTED).add_modifier(Modifier::BOLD),
        ),
        Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(status), halves[0]);

    let clock = chrono::Local::now().format("%H:%M:%S - %Y-%m-%d ").to_string();
    frame.render_widget(
        Paragraph::new(clock)
            .alignment(Alignment::Right)
            .style(Style::default().fg(MUTED)),
        halves[1],
    );
}

/// 控制区：按键即按钮
fn render_controls(app: &App, frame: &mut Frame, area: Rect) {
    let (alert_label, alert_color) = match app.session.status() {
        SystemStatus::Normal => ("ACTIVATE ALERT MODE", ALERT),
        SystemStatus::Alert => ("DEACTIVATE ALERT MODE", CALM),
    };
    let button = |key: &'static str, label: &'static str, bg: Color| {
        vec![
            Span::styled(
                format!(" [{key}] {label} "),
                Style::default()
                    .bg(bg)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
        ]
    };

    let mut spans = Vec::new();
    spans.extend(button("a", alert_label, alert_color));
    spans.extend(button("s", "SYSTEM SCAN", SCAN));
    spans.extend(button("i", "SYSTEM INFO", INFO));
    spans.push(Span::styled(
        "[j/k] scroll  [G] follow  [q] quit",
        Style::default().fg(MUTED),
    ));

    let controls = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(MUTED))
            .style(Style::default().bg(PANEL)),
    );
    frame.render_widget(controls, area);
}

/// 活动流，scroll_offset 为距离底部的行数
/// 活动流每条记录占一行，超出面板宽度的部分截断，保证跟随末尾时最新一行可见
fn render_feed(app: &App, frame: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let width = area.width.saturating_sub(2) as usize;
    let lines: Vec<Line> = {
        let feed = app.feed.lock().unwrap_or_else(PoisonError::into_inner);
        let total = feed.lines.len();
        let end = total.saturating_sub(app.scroll_offset.min(total));
        let start = end.saturating_sub(visible);
        feed.lines
            .range(start..end)
            .map(|l| Line::from(l.chars().take(width).collect::<String>()))
            .collect()
    };

    let title = if app.scroll_offset == 0 {
        " ACTIVITY LOG ".to_string()
    } else {
        format!(" ACTIVITY LOG (+{} newer) ", app.scroll_offset)
    };
    let feed = Paragraph::new(lines)
        .style(Style::default().fg(NOMINAL).bg(BACKGROUND))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
                .border_style(Style::default().fg(MUTED)),
        );
    frame.render_widget(feed, area);
}
