//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use gather_common::Platform;

use crate::domain::TerraformState;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Where and as whom to open the remote shell.
#[derive(Debug, Clone, Copy)]
pub struct SshTarget<'a> {
    /// Hostname or IP of the bootstrap host.
    pub host: &'a str,
    /// SSH port.
    pub port: u16,
    /// Remote user.
    pub user: &'a str,
    /// Private keys to try, in order. Empty means ambient credentials.
    pub key_paths: &'a [PathBuf],
    /// Connect and I/O deadline. `None` keeps the transport defaults.
    pub timeout: Option<Duration>,
}

// ── State Ports ───────────────────────────────────────────────────────────────

/// Read access to the infrastructure state left by the provisioning phase.
#[allow(async_fn_in_trait)]
pub trait InfraStateStore {
    /// Load the state.
    ///
    /// # Errors
    ///
    /// Fails with `GatherError::StateUnavailable` when no state has been
    /// written yet, and with any other error when it exists but cannot be read.
    async fn load_async(&self) -> Result<TerraformState>;
}

/// Read access to the installation's configured platform.
#[allow(async_fn_in_trait)]
pub trait InstallConfigStore {
    /// The platform named in the install config.
    async fn platform_async(&self) -> Result<Platform>;
}

// ── Remote Shell Ports ────────────────────────────────────────────────────────

/// Opens authenticated remote shell sessions.
#[allow(async_fn_in_trait)]
pub trait RemoteConnector {
    type Session: RemoteSession;

    /// Connect and authenticate. The returned session closes its connection
    /// when dropped.
    async fn connect(&self, target: &SshTarget<'_>) -> Result<Self::Session>;
}

/// A live remote shell session.
#[allow(async_fn_in_trait)]
pub trait RemoteSession {
    /// Run `command` remotely, failing on a non-zero exit status.
    async fn run(&mut self, command: &str) -> Result<()>;

    /// Copy the remote file at `remote` to the new local file `local`,
    /// returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Must fail without touching `local` if that file already exists.
    async fn pull_file(&mut self, remote: &str, local: &Path) -> Result<u64>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
