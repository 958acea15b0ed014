// tests/system_runner.rs

use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use hyprdesk::errors::DeskError;
use hyprdesk::exec::{CommandRunner, ExecutionRequest, SystemRunner};
use hyprdesk_test_utils::{LogCapture, init_tracing, with_timeout};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn sh(script: &str) -> ExecutionRequest {
    ExecutionRequest::new("sh").args(["-c", script])
}

#[tokio::test]
async fn run_returns_stdout_of_successful_command() -> TestResult {
    init_tracing();
    let runner = SystemRunner::new();

    let out = runner.run(ExecutionRequest::new("echo").args(["hello", "world"])).await?;
    assert_eq!(out, "hello world\n");
    Ok(())
}

#[tokio::test]
async fn run_keeps_stderr_out_of_stdout() -> TestResult {
    init_tracing();
    let runner = SystemRunner::new();

    let out = runner.run(sh("echo out; echo err >&2")).await?;
    assert_eq!(out, "out\n");
    Ok(())
}

#[tokio::test]
async fn run_combined_interleaves_both_streams() -> TestResult {
    init_tracing();
    let runner = SystemRunner::new();

    let out = runner.run_combined(sh("echo out; echo err >&2")).await?;
    assert!(out.contains("out\n"));
    assert!(out.contains("err\n"));
    Ok(())
}

#[tokio::test]
async fn failing_command_reports_exit_code_and_stderr() {
    init_tracing();
    let runner = SystemRunner::new();

    match runner.run(sh("echo boom >&2; exit 3")).await {
        Err(DeskError::NonZeroExit { code, stderr, .. }) => {
            assert_eq!(code, Some(3));
            assert_eq!(stderr, "boom");
        }
        other => panic!("expected NonZeroExit, got {other:?}"),
    }
}

#[tokio::test]
async fn non_zero_exit_is_left_to_the_caller_to_report() {
    let (logs, _guard) = LogCapture::install();
    let runner = SystemRunner::new();

    let result = runner.run(sh("exit 1")).await;
    assert!(matches!(result, Err(DeskError::NonZeroExit { code: Some(1), .. })));

    let captured = logs.contents();
    assert!(captured.contains("non-zero status"), "{captured}");
    assert!(logs.lines_at("ERROR").is_empty(), "{captured}");
}

#[tokio::test]
async fn combined_failure_carries_combined_output() {
    init_tracing();
    let runner = SystemRunner::new();

    match runner.run_combined(sh("echo partial; echo broken >&2; exit 1")).await {
        Err(DeskError::NonZeroExit { stderr, .. }) => {
            assert!(stderr.contains("partial"));
            assert!(stderr.contains("broken"));
        }
        other => panic!("expected NonZeroExit, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_binary_is_a_start_failure() {
    init_tracing();
    let runner = SystemRunner::new();

    let request = ExecutionRequest::new("hyprdesk-definitely-not-installed");
    match runner.run(request.clone()).await {
        Err(DeskError::StartFailure { command, .. }) => {
            assert_eq!(command, "hyprdesk-definitely-not-installed");
        }
        other => panic!("expected StartFailure, got {other:?}"),
    }

    assert!(matches!(
        runner.start(request).await,
        Err(DeskError::StartFailure { .. })
    ));
}

#[tokio::test]
async fn timeout_kills_the_child() -> TestResult {
    init_tracing();
    let runner = SystemRunner::new();
    let dir = TempDir::new()?;
    let pid_file = dir.path().join("pid");

    let request = ExecutionRequest::new("sh")
        .args([
            "-c".to_string(),
            r#"echo $$ > "$0"; exec sleep 30"#.to_string(),
            pid_file.display().to_string(),
        ])
        .timeout_secs(1);

    let started = Instant::now();
    let result = with_timeout(runner.run(request)).await;
    let elapsed = started.elapsed();

    match result {
        Err(DeskError::Timeout { timeout, .. }) => assert_eq!(timeout, Duration::from_secs(1)),
        other => panic!("expected Timeout, got {other:?}"),
    }
    assert!(elapsed < Duration::from_secs(4), "took {elapsed:?}");

    let pid = fs::read_to_string(&pid_file)?.trim().to_string();
    assert!(
        !Path::new(&format!("/proc/{pid}")).exists(),
        "child {pid} still exists after timeout"
    );
    Ok(())
}

#[tokio::test]
async fn env_overrides_and_working_dir_apply() -> TestResult {
    init_tracing();
    let runner = SystemRunner::new();
    let dir = TempDir::new()?;

    let request = sh(r#"echo "$HYPRDESK_TEST_VALUE"; echo "$HOME"; pwd -P"#)
        .env("HYPRDESK_TEST_VALUE", "layered")
        .dir(dir.path());
    let out = runner.run(request).await?;
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], "layered");
    // Inherited variables survive the override.
    assert_eq!(lines[1], std::env::var("HOME").unwrap_or_default());
    assert_eq!(Path::new(lines[2]), dir.path().canonicalize()?);
    Ok(())
}

#[tokio::test]
async fn discarded_stdout_yields_empty_output() -> TestResult {
    init_tracing();
    let runner = SystemRunner::new();

    let out = runner.run(ExecutionRequest::new("echo").arg("hidden").discard_stdout()).await?;
    assert!(out.is_empty());
    Ok(())
}

#[tokio::test]
async fn children_read_from_the_null_device() -> TestResult {
    init_tracing();
    let runner = SystemRunner::new();

    // `cat` would block forever on an inherited terminal.
    let out = with_timeout(runner.run(ExecutionRequest::new("cat"))).await?;
    assert!(out.is_empty());
    Ok(())
}

#[tokio::test]
async fn start_returns_immediately_and_detaches_into_own_group() -> TestResult {
    init_tracing();
    let runner = SystemRunner::new();

    let started = Instant::now();
    let pid = runner
        .start(ExecutionRequest::new("sleep").arg("30").detached().discard_output())
        .await?;
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(pid > 0);

    let stat = fs::read_to_string(format!("/proc/{pid}/stat"))?;
    // Fields after the command name: state, ppid, pgrp, ...
    let after_comm = stat.rsplit_once(')').map(|(_, rest)| rest).unwrap_or_default();
    let pgrp: u32 = after_comm.split_whitespace().nth(2).unwrap_or_default().parse()?;
    assert_eq!(pgrp, pid, "detached child should lead its own process group");

    std::process::Command::new("kill").arg(pid.to_string()).status()?;
    Ok(())
}

#[tokio::test]
async fn start_is_not_bound_by_the_timeout() -> TestResult {
    init_tracing();
    let runner = SystemRunner::new();

    let pid = runner
        .start(ExecutionRequest::new("sleep").arg("30").timeout_secs(1).discard_output())
        .await?;
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let state = fs::read_to_string(format!("/proc/{pid}/stat"))?;
    assert!(!state.contains(") Z"), "started process should still be alive");

    std::process::Command::new("kill").arg(pid.to_string()).status()?;
    Ok(())
}
