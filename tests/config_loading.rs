// tests/config_loading.rs

use std::io::Write;
use std::time::Duration;

use hyprdesk::config::{load_and_validate, parse_interval};
use hyprdesk::errors::DeskError;
use hyprdesk::types::JobKind;
use proptest::prelude::*;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn expect_config_error(contents: &str) -> String {
    let file = write_config(contents);
    match load_and_validate(file.path()) {
        Err(DeskError::ConfigError(msg)) => msg,
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_full_job_source_is_parsed() {
    let file = write_config(
        r#"
[[jobs]]
name = "wallpaper"
description = "Rotate the wallpaper"
type = "handler"
command = "$set_random_wallpaper"
interval = "30m"
args = { path = "~/Pictures/Wallpapers/Active" }

[[jobs]]
name = "lock"
type = "defined"
command = "$update_lock_screen_phrase"
interval = "1h30m"
args = { jokes = true, provider = ["fortune"], retries = 3 }

[[jobs]]
name = "sync"
type = "shell"
command = "  vdirsyncer sync  "
interval = "90s"
"#,
    );

    let jobs = load_and_validate(file.path()).unwrap().into_jobs();
    assert_eq!(jobs.len(), 3);

    let wallpaper = &jobs[0];
    assert_eq!(wallpaper.kind, JobKind::Handler);
    assert_eq!(wallpaper.description, "Rotate the wallpaper");
    assert_eq!(wallpaper.interval, Duration::from_secs(30 * 60));
    assert_eq!(
        wallpaper.args.str("path").unwrap(),
        Some("~/Pictures/Wallpapers/Active")
    );

    let lock = &jobs[1];
    assert_eq!(lock.kind, JobKind::Handler);
    assert_eq!(lock.interval, Duration::from_secs(5400));
    assert_eq!(lock.args.bool("jokes").unwrap(), Some(true));
    assert_eq!(lock.args.list("provider").unwrap(), Some(vec!["fortune".to_string()]));
    assert!(lock.args.contains("retries"));
    assert!(matches!(lock.args.str("retries"), Err(DeskError::ConfigError(_))));

    let sync = &jobs[2];
    assert_eq!(sync.kind, JobKind::Shell);
    assert_eq!(sync.command, "vdirsyncer sync");
    assert!(sync.args.is_empty());
}

#[test]
fn test_empty_job_source_is_rejected() {
    let msg = expect_config_error("");
    assert!(msg.contains("at least one"));
}

#[test]
fn test_missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("cron.toml");

    match load_and_validate(&missing) {
        Err(DeskError::ConfigError(msg)) => assert!(msg.contains("failed to read")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_malformed_toml_is_a_config_error() {
    expect_config_error("[[jobs]\nname = ");
}

#[test]
fn test_unknown_job_type_is_a_config_error() {
    let msg = expect_config_error(
        r#"
[[jobs]]
name = "x"
type = "cron"
command = "true"
interval = "1s"
"#,
    );
    assert!(msg.contains("unknown variant"));
}

#[test]
fn test_duplicate_names_are_rejected() {
    let msg = expect_config_error(
        r#"
[[jobs]]
name = "same"
type = "shell"
command = "true"
interval = "1s"

[[jobs]]
name = "same"
type = "shell"
command = "false"
interval = "2s"
"#,
    );
    assert!(msg.contains("duplicate job name"));
}

#[test]
fn test_blank_name_and_command_are_rejected() {
    let msg = expect_config_error(
        r#"
[[jobs]]
name = " "
type = "shell"
command = "true"
interval = "1s"
"#,
    );
    assert!(msg.contains("name"));

    let msg = expect_config_error(
        r#"
[[jobs]]
name = "blank"
type = "shell"
command = ""
interval = "1s"
"#,
    );
    assert!(msg.contains("empty command"));
}

#[test]
fn test_bad_intervals_are_rejected() {
    for interval in ["0s", "soon", "10", "5d"] {
        let msg = expect_config_error(&format!(
            r#"
[[jobs]]
name = "tick"
type = "shell"
command = "true"
interval = "{interval}"
"#
        ));
        assert!(msg.contains("tick"), "{interval}: {msg}");
    }
}

#[test]
fn test_float_argument_is_rejected() {
    expect_config_error(
        r#"
[[jobs]]
name = "x"
type = "handler"
command = "$h"
interval = "1s"
args = { ratio = 0.5 }
"#,
    );
}

#[test]
fn test_mistyped_argument_reports_expected_type() {
    let file = write_config(
        r#"
[[jobs]]
name = "x"
type = "handler"
command = "$h"
interval = "1s"
args = { jokes = "yes" }
"#,
    );
    let jobs = load_and_validate(file.path()).unwrap().into_jobs();
    assert_eq!(jobs[0].args.str("jokes").unwrap(), Some("yes"));
    match jobs[0].args.bool("jokes") {
        Err(DeskError::ConfigError(msg)) => assert!(msg.contains("must be a bool")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
    assert!(matches!(
        jobs[0].args.require_str("path"),
        Err(DeskError::ConfigError(_))
    ));
}

proptest! {
    #[test]
    fn compound_intervals_add_up(h in 0u64..48, m in 0u64..60, s in 1u64..60) {
        let text = format!("{h}h{m}m{s}s");
        let expected = Duration::from_secs(h * 3600 + m * 60 + s);
        prop_assert_eq!(parse_interval(&text), Ok(expected));
    }

    #[test]
    fn plain_integers_without_unit_are_rejected(n in 0u64..1_000_000) {
        prop_assert!(parse_interval(&n.to_string()).is_err());
    }
}
