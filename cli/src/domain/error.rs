//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use gather_common::AddressError;
use thiserror::Error;

/// Boxed cause carried by errors that wrap an infrastructure failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ── State extraction errors ───────────────────────────────────────────────────

/// A strategy could not read an address out of the infrastructure state.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("resource {address} not found in state")]
    ResourceNotFound { address: String },

    #[error("resource {address} has no instances")]
    NoInstances { address: String },

    #[error("attribute {pointer} of {address} instance {index} is missing or not a string")]
    MissingAttribute {
        address: String,
        index: usize,
        pointer: String,
    },

    #[error("{} instance(s) of {address} have no address: {}", .failures.len(), join_failures(.failures))]
    Incomplete {
        address: String,
        failures: Vec<ExtractError>,
    },

    /// The state holds a value that cannot be passed on the remote command line.
    #[error("unusable host address in state: {0}")]
    InvalidAddress(AddressError),
}

fn join_failures(failures: &[ExtractError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ── Address resolution errors ─────────────────────────────────────────────────

/// Errors returned by the platform dispatcher.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No extraction strategy is registered for the platform.
    #[error(
        "Cannot fetch the bootstrap and control plane host addresses from state file for {platform} platform"
    )]
    UnsupportedPlatform { platform: String },

    /// The strategy ran but could not determine the bootstrap address.
    #[error("failed to get bootstrap and control plane host addresses from state")]
    BootstrapExtraction(#[source] ExtractError),
}

// ── Gather errors ─────────────────────────────────────────────────────────────

/// Errors raised while locating hosts and pulling the log bundle.
#[derive(Debug, Error)]
pub enum GatherError {
    #[error("no infrastructure state found at {}", .path.display())]
    StateUnavailable { path: PathBuf },

    #[error("failed to read state from {}", .path.display())]
    StateUnreadable {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error(
        "bootstrap host address and at least one control plane host address must be provided"
    )]
    MissingManualAddresses,

    #[error("bootstrap host address is empty")]
    EmptyBootstrapAddress,

    #[error("failed to create SSH client")]
    RemoteConnect(#[source] BoxError),

    #[error("failed to run remote command")]
    RemoteExec(#[source] BoxError),

    #[error("failed to pull log file from remote")]
    RemoteTransfer(#[source] BoxError),
}
