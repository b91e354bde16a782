//! 后台心跳测试 - 暂停时钟下验证间隔与停止

use std::sync::Arc;
use std::time::Duration;

use hud_console::{ConsoleConfig, RecordingPresentation, Session, HEARTBEAT_MESSAGE};
use tempfile::TempDir;

async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

fn heartbeats(presentation: &RecordingPresentation) -> usize {
    presentation
        .lines()
        .iter()
        .filter(|l| *l == HEARTBEAT_MESSAGE)
        .count()
}

#[tokio::test(start_paused = true)]
async fn test_session_heartbeat_every_interval() {
    let dir = TempDir::new().unwrap();
    let config = ConsoleConfig {
        log_path: dir.path().join("events.log"),
        ..Default::default()
    };
    let presentation = Arc::new(RecordingPresentation::new());
    let mut session = Session::start(config, presentation.clone());
    settle().await;

    // D = 300s, I = 60s -> 5 次
    for _ in 0..5 {
        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
    }
    assert_eq!(heartbeats(&presentation), 5);

    session.shutdown().await;
    tokio::time::advance(Duration::from_secs(600)).await;
    settle().await;
    assert_eq!(heartbeats(&presentation), 5);

    let logged = session.logger().read_recent(usize::MAX).unwrap();
    assert_eq!(
        logged.iter().filter(|e| e.message == HEARTBEAT_MESSAGE).count(),
        5
    );
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_does_not_block_toggle() {
    let dir = TempDir::new().unwrap();
    let config = ConsoleConfig {
        log_path: dir.path().join("events.log"),
        monitor_interval_secs: 1,
        ..Default::default()
    };
    let presentation = Arc::new(RecordingPresentation::new());
    let mut session = Session::start(config, presentation.clone());
    settle().await;

    tokio::time::advance(Duration::from_secs(2)).await;
    settle().await;
    session.toggle_alert();
    tokio::time::advance(Duration::from_secs(1)).await;
    settle().await;

    assert_eq!(heartbeats(&presentation), 3);
    assert!(presentation.lines().contains(&"Alert mode activated".to_string()));
    session.shutdown().await;
}
