//! Application service: pull the log bundle off the bootstrap host.
//!
//! Connect, run the collection script, copy the archive back. Each step
//! depends on the previous one and any failure ends the session. The session
//! is owned by this function and is dropped (disconnected) on every return
//! path.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use tracing::info;

use crate::application::ports::{ProgressReporter, RemoteConnector, RemoteSession, SshTarget};
use crate::domain::addresses::GatherTarget;
use crate::domain::bundle::{REMOTE_BUNDLE_PATH, REMOTE_USER, bundle_path, collection_command};
use crate::domain::error::GatherError;

/// Everything needed for one gather session.
#[derive(Debug, Clone)]
pub struct SessionDescriptor {
    pub target: GatherTarget,
    /// Directory the bundle is written to.
    pub output_dir: PathBuf,
    /// Private keys to try. Empty means the agent and default keys.
    pub key_paths: Vec<PathBuf>,
    /// Connect and I/O deadline. `None` keeps the transport defaults.
    pub timeout: Option<Duration>,
}

impl SessionDescriptor {
    fn ssh_target(&self) -> SshTarget<'_> {
        SshTarget {
            host: self.target.bootstrap(),
            port: self.target.port(),
            user: REMOTE_USER,
            key_paths: &self.key_paths,
            timeout: self.timeout,
        }
    }
}

/// Run the collection script on the bootstrap host and copy the resulting
/// archive to `<output_dir>/log-bundle-<timestamp>.tar.gz`.
///
/// `captured_at` is called once, after the script finishes, to stamp the
/// local file name.
///
/// # Errors
///
/// Returns [`GatherError::RemoteConnect`], [`GatherError::RemoteExec`] or
/// [`GatherError::RemoteTransfer`] depending on which step failed.
pub async fn collect_log_bundle<C, Tz>(
    connector: &C,
    reporter: &impl ProgressReporter,
    descriptor: &SessionDescriptor,
    captured_at: impl FnOnce() -> DateTime<Tz>,
) -> Result<PathBuf, GatherError>
where
    C: RemoteConnector,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let endpoint = descriptor.target.endpoint();
    reporter.step(&format!("Connecting to bootstrap host {endpoint}"));
    info!(%endpoint, keys = descriptor.key_paths.len(), "connecting to bootstrap host");
    let mut session = connector
        .connect(&descriptor.ssh_target())
        .await
        .map_err(|e| GatherError::RemoteConnect(e.into()))?;

    let command = collection_command(descriptor.target.control_plane());
    reporter.step("Running log collection on the bootstrap host");
    info!(%command, "running remote collection script");
    session
        .run(&command)
        .await
        .map_err(|e| GatherError::RemoteExec(e.into()))?;

    let local = bundle_path(&descriptor.output_dir, &captured_at());
    reporter.step("Downloading log bundle");
    let bytes = session
        .pull_file(REMOTE_BUNDLE_PATH, &local)
        .await
        .map_err(|e| GatherError::RemoteTransfer(e.into()))?;
    info!(path = %local.display(), bytes, "log bundle written");

    drop(session);
    Ok(local)
}
