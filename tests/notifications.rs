// tests/notifications.rs

use std::error::Error;

use hyprdesk::errors::DeskError;
use hyprdesk::hyprland::notifications::{NotificationProvider, clear_notifications};
use hyprdesk_test_utils::{FakeRunner, Method, Reply, init_tracing};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn swaync_closes_all_notifications() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new();

    clear_notifications(&runner, NotificationProvider::Swaync).await?;

    assert_eq!(runner.command_lines(), vec!["swaync-client --close-all"]);
    assert!(runner.calls().iter().all(|call| call.method == Method::Run));
    Ok(())
}

#[tokio::test]
async fn dunst_clears_its_history() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new();

    clear_notifications(&runner, NotificationProvider::Dunst).await?;

    assert_eq!(runner.command_lines(), vec!["dunstctl history-clear"]);
    Ok(())
}

#[tokio::test]
async fn daemon_failure_is_propagated() {
    init_tracing();
    let runner = FakeRunner::new();
    runner.on("dunstctl", Reply::fail(1, "dunst is not running"));

    match clear_notifications(&runner, NotificationProvider::Dunst).await {
        Err(DeskError::NonZeroExit { stderr, .. }) => assert_eq!(stderr, "dunst is not running"),
        other => panic!("expected NonZeroExit, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_client_binary_is_propagated() {
    init_tracing();
    let runner = FakeRunner::new();
    runner.on("swaync-client", Reply::NotInstalled);

    assert!(clear_notifications(&runner, NotificationProvider::Swaync).await.is_err());
    assert_eq!(runner.call_count(), 1);
}

#[test]
fn unsupported_provider_is_a_config_error() {
    match "mako".parse::<NotificationProvider>() {
        Err(DeskError::ConfigError(msg)) => assert!(msg.contains("mako")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
    assert_eq!(" Dunst ".parse::<NotificationProvider>().ok(), Some(NotificationProvider::Dunst));
}
