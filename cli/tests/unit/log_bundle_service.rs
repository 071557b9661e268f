//! Tests for the `log_bundle` application service: the connect, run, pull
//! sequence and how each step's failure is reported.

#![allow(clippy::expect_used)]

use std::path::Path;

use bootstrap_gather::application::services::log_bundle::{SessionDescriptor, collect_log_bundle};
use bootstrap_gather::domain::GatherTarget;
use bootstrap_gather::domain::error::GatherError;
use chrono::{DateTime, FixedOffset, TimeZone};

use crate::mocks::{FailAt, MockConnector, RecordingReporter};

fn descriptor(output_dir: &Path, masters: &[&str]) -> SessionDescriptor {
    SessionDescriptor {
        target: GatherTarget::new(
            "10.0.0.5",
            22,
            masters.iter().map(ToString::to_string).collect(),
        )
        .expect("target"),
        output_dir: output_dir.to_path_buf(),
        key_paths: Vec::new(),
        timeout: None,
    }
}

fn noon() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .expect("offset")
        .with_ymd_and_hms(2026, 1, 2, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[tokio::test]
async fn bundle_is_named_after_local_capture_time() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let connector = MockConnector::new();

    let path = collect_log_bundle(
        &connector,
        &RecordingReporter::default(),
        &descriptor(dir.path(), &["10.0.0.6"]),
        noon,
    )
    .await
    .expect("collect");

    assert_eq!(path, dir.path().join("log-bundle-20260102120000.tar.gz"));
}

#[tokio::test]
async fn empty_control_plane_runs_bare_script() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let connector = MockConnector::new();

    collect_log_bundle(
        &connector,
        &RecordingReporter::default(),
        &descriptor(dir.path(), &[]),
        noon,
    )
    .await
    .expect("collect");

    assert_eq!(
        connector.log().commands,
        vec!["/usr/local/bin/installer-gather.sh"]
    );
}

#[tokio::test]
async fn connect_failure_is_remote_connect() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let connector = MockConnector::failing_at(FailAt::Connect);

    let err = collect_log_bundle(
        &connector,
        &RecordingReporter::default(),
        &descriptor(dir.path(), &["10.0.0.6"]),
        noon,
    )
    .await
    .expect_err("connect fails");

    assert!(matches!(err, GatherError::RemoteConnect(_)));
    assert_eq!(err.to_string(), "failed to create SSH client");
    let log = connector.log();
    assert!(log.commands.is_empty());
    assert_eq!(log.sessions_dropped, 0);
}

#[tokio::test]
async fn run_failure_is_remote_exec_and_releases_session() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let connector = MockConnector::failing_at(FailAt::Run);

    let err = collect_log_bundle(
        &connector,
        &RecordingReporter::default(),
        &descriptor(dir.path(), &["10.0.0.6"]),
        noon,
    )
    .await
    .expect_err("script fails");

    assert!(matches!(err, GatherError::RemoteExec(_)));
    assert_eq!(err.to_string(), "failed to run remote command");
    let log = connector.log();
    assert!(log.pulls.is_empty(), "nothing is pulled after a failed script");
    assert_eq!(log.sessions_dropped, 1);
}

#[tokio::test]
async fn pull_failure_is_remote_transfer_and_releases_session() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let connector = MockConnector::failing_at(FailAt::Pull);

    let err = collect_log_bundle(
        &connector,
        &RecordingReporter::default(),
        &descriptor(dir.path(), &["10.0.0.6"]),
        noon,
    )
    .await
    .expect_err("pull fails");

    assert!(matches!(err, GatherError::RemoteTransfer(_)));
    assert_eq!(err.to_string(), "failed to pull log file from remote");
    assert_eq!(connector.log().sessions_dropped, 1);
    assert_eq!(std::fs::read_dir(dir.path()).expect("dir").count(), 0);
}

#[tokio::test]
async fn session_released_after_success() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let connector = MockConnector::new();

    collect_log_bundle(
        &connector,
        &RecordingReporter::default(),
        &descriptor(dir.path(), &["10.0.0.6"]),
        noon,
    )
    .await
    .expect("collect");

    assert_eq!(connector.log().sessions_dropped, 1);
}

/// Two gathers within the same second target the same file name. The second
/// one fails instead of overwriting the first bundle.
#[tokio::test]
async fn same_second_collision_keeps_first_bundle() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let first = MockConnector {
        payload: b"first".to_vec(),
        ..MockConnector::new()
    };
    let second = MockConnector {
        payload: b"second".to_vec(),
        ..MockConnector::new()
    };
    let reporter = RecordingReporter::default();
    let target = descriptor(dir.path(), &["10.0.0.6"]);

    let path = collect_log_bundle(&first, &reporter, &target, noon)
        .await
        .expect("first gather");
    let err = collect_log_bundle(&second, &reporter, &target, noon)
        .await
        .expect_err("second gather collides");

    assert!(matches!(err, GatherError::RemoteTransfer(_)));
    assert_eq!(std::fs::read(&path).expect("bundle"), b"first");
    assert_eq!(second.log().sessions_dropped, 1);
}

#[tokio::test]
async fn reports_each_step() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let reporter = RecordingReporter::default();

    collect_log_bundle(
        &MockConnector::new(),
        &reporter,
        &descriptor(dir.path(), &["10.0.0.6"]),
        noon,
    )
    .await
    .expect("collect");

    let steps = reporter.steps.borrow();
    assert_eq!(steps.len(), 3);
    assert!(steps[0].contains("10.0.0.5:22"));
}
