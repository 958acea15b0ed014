// tests/reload_orchestrator.rs

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use hyprdesk::errors::DeskError;
use hyprdesk::reload::{ReloadOptions, ReloadOrchestrator, SessionEnv};
use hyprdesk::types::ReloadTarget;
use hyprdesk_test_utils::{FakeProcesses, FakeRunner, Method, Reply, init_tracing};

type TestResult = Result<(), Box<dyn Error>>;

const NO_DELAY: ReloadOptions = ReloadOptions {
    kill_wait: Duration::ZERO,
    settle_delay: Duration::ZERO,
};

struct Fixture {
    runner: Arc<FakeRunner>,
    processes: Arc<FakeProcesses>,
}

impl Fixture {
    fn new() -> Self {
        init_tracing();
        let processes = Arc::new(FakeProcesses::new());
        let runner = Arc::new(FakeRunner::with_processes(processes.clone()));
        Self { runner, processes }
    }

    fn orchestrator(&self, session: SessionEnv) -> ReloadOrchestrator {
        ReloadOrchestrator::new(
            self.runner.clone(),
            self.processes.clone(),
            session,
            NO_DELAY,
        )
    }

    async fn reload(&self, target: ReloadTarget) -> Result<(), DeskError> {
        self.orchestrator(wayland_session()).reload(target).await
    }
}

fn wayland_session() -> SessionEnv {
    SessionEnv::new(Some("wayland-1"), Some("abc123"))
}

#[tokio::test]
async fn missing_display_fails_before_any_side_effect() {
    let fx = Fixture::new();
    fx.processes.set_running("waybar");

    for target in [ReloadTarget::All, ReloadTarget::WindowManager, ReloadTarget::StatusBar] {
        let result = fx
            .orchestrator(SessionEnv::new(None, Some("abc123")))
            .reload(target)
            .await;
        assert!(
            matches!(result, Err(DeskError::EnvironmentError(_))),
            "{target}: {result:?}"
        );
    }

    assert_eq!(fx.runner.call_count(), 0);
    assert!(fx.processes.killed().is_empty());
}

#[tokio::test]
async fn missing_instance_signature_does_not_block_reload() -> TestResult {
    let fx = Fixture::new();

    fx.orchestrator(SessionEnv::new(Some("wayland-1"), None))
        .reload(ReloadTarget::WindowManager)
        .await?;

    assert_eq!(fx.runner.command_lines(), vec!["hyprctl reload", "hyprctl version"]);
    Ok(())
}

#[tokio::test]
async fn missing_dependency_fails_before_any_side_effect() {
    let fx = Fixture::new();
    fx.processes.missing_binary("waybar").set_running("waybar");

    match fx.reload(ReloadTarget::All).await {
        Err(DeskError::DependencyError(name)) => assert_eq!(name, "waybar"),
        other => panic!("expected DependencyError, got {other:?}"),
    }
    assert_eq!(fx.runner.call_count(), 0);
    assert!(fx.processes.killed().is_empty());
}

#[tokio::test]
async fn window_manager_reload_does_not_need_the_status_bar() -> TestResult {
    let fx = Fixture::new();
    fx.processes.missing_binary("waybar");

    fx.reload(ReloadTarget::WindowManager).await?;
    assert_eq!(fx.runner.command_lines(), vec!["hyprctl reload", "hyprctl version"]);
    Ok(())
}

#[test]
fn required_binaries_follow_the_target() {
    assert_eq!(
        ReloadOrchestrator::required_binaries(ReloadTarget::WindowManager),
        vec!["hyprctl", "pgrep", "kill"]
    );
    assert_eq!(
        ReloadOrchestrator::required_binaries(ReloadTarget::All),
        vec!["hyprctl", "pgrep", "kill", "waybar"]
    );
}

#[tokio::test]
async fn window_manager_failure_skips_the_health_check() {
    let fx = Fixture::new();
    fx.runner.on("hyprctl reload", Reply::fail(1, "couldn't connect"));

    assert!(matches!(
        fx.reload(ReloadTarget::WindowManager).await,
        Err(DeskError::NonZeroExit { .. })
    ));
    assert_eq!(fx.runner.command_lines(), vec!["hyprctl reload"]);
}

#[tokio::test]
async fn unresponsive_window_manager_fails_the_health_check() {
    let fx = Fixture::new();
    fx.runner.on("hyprctl version", Reply::Timeout);

    assert!(matches!(
        fx.reload(ReloadTarget::WindowManager).await,
        Err(DeskError::HealthCheck(_))
    ));
}

#[tokio::test]
async fn all_restarts_running_bar_then_reloads_window_manager() -> TestResult {
    let fx = Fixture::new();
    fx.processes.set_running("waybar");

    fx.reload(ReloadTarget::All).await?;

    assert_eq!(fx.processes.killed(), vec!["waybar"]);
    assert_eq!(
        fx.runner.command_lines(),
        vec!["waybar", "hyprctl reload", "hyprctl version"]
    );
    assert!(fx.processes.running("waybar"));
    Ok(())
}

#[tokio::test]
async fn status_bar_is_started_detached_with_output_discarded() -> TestResult {
    let fx = Fixture::new();

    fx.reload(ReloadTarget::StatusBar).await?;

    let calls = fx.runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::Start);
    assert!(calls[0].request.detach);
    assert!(calls[0].request.discard_stdout && calls[0].request.discard_stderr);
    Ok(())
}

#[tokio::test]
async fn all_continues_to_window_manager_when_bar_fails() {
    let fx = Fixture::new();
    fx.runner.on("waybar", Reply::NotInstalled);

    let result = fx.reload(ReloadTarget::All).await;

    // The window manager is still reloaded; the bar then fails the health
    // check because it never came up.
    assert!(fx.runner.command_lines().contains(&"hyprctl reload".to_string()));
    assert!(matches!(result, Err(DeskError::HealthCheck(_))), "{result:?}");
}

#[tokio::test]
async fn all_aborts_when_window_manager_reload_fails() {
    let fx = Fixture::new();
    fx.runner.on("hyprctl reload", Reply::fail(1, "boom"));

    assert!(matches!(
        fx.reload(ReloadTarget::All).await,
        Err(DeskError::NonZeroExit { .. })
    ));
    assert!(!fx.runner.command_lines().contains(&"hyprctl version".to_string()));
}

#[tokio::test]
async fn failed_bar_termination_still_attempts_restart() -> TestResult {
    let fx = Fixture::new();
    fx.processes.set_running("waybar").fail_kill("waybar");

    fx.reload(ReloadTarget::StatusBar).await?;

    assert!(fx.processes.killed().is_empty());
    assert_eq!(fx.runner.started(), vec!["waybar"]);
    Ok(())
}

#[tokio::test]
async fn status_bar_start_failure_is_fatal_for_bar_only_reload() {
    let fx = Fixture::new();
    fx.runner.on("waybar", Reply::NotInstalled);

    assert!(matches!(
        fx.reload(ReloadTarget::StatusBar).await,
        Err(DeskError::StartFailure { .. })
    ));
    assert!(!fx.runner.command_lines().iter().any(|c| c.starts_with("hyprctl")));
}

#[tokio::test]
async fn bar_that_exits_right_away_fails_the_health_check() {
    init_tracing();
    // Not linked: a successful start does not mark the bar as running.
    let runner = Arc::new(FakeRunner::new());
    let processes = Arc::new(FakeProcesses::new());
    let orchestrator =
        ReloadOrchestrator::new(runner.clone(), processes, wayland_session(), NO_DELAY);

    assert!(matches!(
        orchestrator.reload(ReloadTarget::StatusBar).await,
        Err(DeskError::HealthCheck(_))
    ));
    assert_eq!(runner.started(), vec!["waybar"]);
}
