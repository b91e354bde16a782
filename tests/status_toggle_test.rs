//! 告警模式切换测试 - 通过 Session 验证状态与事件日志一致

use std::sync::Arc;

use hud_console::{
    ConsoleConfig, RecordingPresentation, Session, StatusStyle, SystemStatus,
};
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> ConsoleConfig {
    ConsoleConfig {
        log_path: dir.path().join("events.log"),
        error_log_path: dir.path().join("error_log.txt"),
        ..Default::default()
    }
}

fn logged_messages(session: &Session) -> Vec<String> {
    session
        .logger()
        .read_recent(usize::MAX)
        .unwrap()
        .into_iter()
        .map(|e| e.message)
        .collect()
}

#[tokio::test]
async fn test_toggle_twice_scenario() {
    // Given: 新会话处于 Normal
    let dir = TempDir::new().unwrap();
    let presentation = Arc::new(RecordingPresentation::new());
    let mut session = Session::start(config_in(&dir), presentation.clone());
    assert_eq!(session.status(), SystemStatus::Normal);

    // When: 切换两次
    assert_eq!(session.toggle_alert(), SystemStatus::Alert);
    assert_eq!(session.toggle_alert(), SystemStatus::Normal);

    // Then: 两条切换事件，最终 Normal
    let messages = logged_messages(&session);
    assert_eq!(
        messages,
        vec!["UI System started", "Alert mode activated", "Alert mode deactivated"]
    );
    assert_eq!(session.status(), SystemStatus::Normal);
    assert_eq!(
        presentation.last_status(),
        Some(("Normal".to_string(), StatusStyle::Nominal))
    );

    session.shutdown().await;
}

#[tokio::test]
async fn test_toggle_count_matches_entries() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::start(config_in(&dir), Arc::new(RecordingPresentation::new()));

    for n in 1..=11 {
        let expected = if n % 2 == 1 {
            SystemStatus::Alert
        } else {
            SystemStatus::Normal
        };
        assert_eq!(session.toggle_alert(), expected);
    }

    let messages = logged_messages(&session);
    let activated = messages.iter().filter(|m| *m == "Alert mode activated").count();
    let deactivated = messages.iter().filter(|m| *m == "Alert mode deactivated").count();
    assert_eq!(activated, 6);
    assert_eq!(deactivated, 5);
    assert_eq!(session.status(), SystemStatus::Alert);

    session.shutdown().await;
}

#[tokio::test]
async fn test_toggle_with_unwritable_log() {
    // Given: 日志目录不存在（写入必然失败）
    let dir = TempDir::new().unwrap();
    let config = ConsoleConfig {
        log_path: dir.path().join("no-such-dir/events.log"),
        ..Default::default()
    };
    let presentation = Arc::new(RecordingPresentation::new());
    let mut session = Session::start(config, presentation.clone());

    // When: 切换
    let status = session.toggle_alert();

    // Then: 状态与显示照常更新，日志文件未创建
    assert_eq!(status, SystemStatus::Alert);
    assert_eq!(session.status(), SystemStatus::Alert);
    assert_eq!(presentation.lines(), vec!["Alert mode activated"]);
    assert_eq!(
        presentation.last_status(),
        Some(("Alert Mode".to_string(), StatusStyle::Alert))
    );
    assert!(!dir.path().join("no-such-dir").exists());

    session.shutdown().await;
}
