//! Application service: the `gather bootstrap` use-case.
//!
//! Works out which hosts to talk to (from state when possible, otherwise from
//! the operator's manual addresses) and then runs a gather session.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use gather_common::Platform;
use tracing::{debug, error};

use crate::application::ports::{
    InfraStateStore, InstallConfigStore, ProgressReporter, RemoteConnector,
};
use crate::application::services::address_resolution::PlatformDispatcher;
use crate::application::services::log_bundle::{SessionDescriptor, collect_log_bundle};
use crate::domain::addresses::{GatherTarget, ManualAddresses};
use crate::domain::error::{GatherError, ResolveError};

/// Operator-supplied options for one `gather bootstrap` run.
#[derive(Debug, Clone, Default)]
pub struct GatherRequest {
    pub manual: ManualAddresses,
    pub output_dir: PathBuf,
    pub key_paths: Vec<PathBuf>,
    pub timeout: Option<Duration>,
}

/// Why the manual addresses were used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualReason {
    /// No infrastructure state exists yet.
    NoState,
    /// State exists but no strategy knows how to read it.
    UnsupportedPlatform(Platform),
}

/// Where the gather target came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSource {
    State(Platform),
    Manual(ManualReason),
}

/// A gather target and its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub target: GatherTarget,
    pub source: AddressSource,
}

fn is_state_unavailable(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<GatherError>(),
        Some(GatherError::StateUnavailable { .. })
    )
}

fn manual_resolution(manual: &ManualAddresses, reason: ManualReason) -> Result<Resolution> {
    let target = manual.resolve()?;
    Ok(Resolution {
        target,
        source: AddressSource::Manual(reason),
    })
}

/// Determine the bootstrap and control plane hosts.
///
/// Without state, or when the platform has no extraction strategy, the
/// manual addresses are used. A bootstrap extraction failure on a supported
/// platform is returned as an error and does not fall back to the manual
/// addresses.
///
/// # Errors
///
/// Returns an error if the state or install config cannot be read, if the
/// bootstrap address cannot be extracted, or if the manual addresses are
/// needed but incomplete.
pub async fn resolve_gather_target(
    states: &impl InfraStateStore,
    configs: &impl InstallConfigStore,
    dispatcher: &PlatformDispatcher,
    manual: &ManualAddresses,
    reporter: &impl ProgressReporter,
) -> Result<Resolution> {
    let state = match states.load_async().await {
        Ok(state) => state,
        Err(e) if is_state_unavailable(&e) => {
            debug!(reason = %e, "using manually supplied host addresses");
            return manual_resolution(manual, ManualReason::NoState);
        }
        Err(e) => return Err(e),
    };

    let platform = configs
        .platform_async()
        .await
        .context("failed to fetch install config")?;

    match dispatcher.resolve(&platform, &state) {
        Ok(hosts) => {
            if let Some(e) = &hosts.control_plane_error {
                reporter.warn(&format!(
                    "Could not determine control plane addresses: {e}"
                ));
            }
            let target = GatherTarget::new(hosts.bootstrap, hosts.port, hosts.control_plane)?;
            Ok(Resolution {
                target,
                source: AddressSource::State(platform),
            })
        }
        Err(e @ ResolveError::UnsupportedPlatform { .. }) => {
            error!("{e}");
            reporter.warn(&e.to_string());
            manual_resolution(manual, ManualReason::UnsupportedPlatform(platform))
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolve the gather target and pull the log bundle from it.
///
/// Returns the path of the downloaded bundle.
///
/// # Errors
///
/// Returns an error if resolution fails (see [`resolve_gather_target`]) or
/// any step of the gather session fails. Nothing is retried.
pub async fn gather_bootstrap<C, Tz>(
    states: &impl InfraStateStore,
    configs: &impl InstallConfigStore,
    dispatcher: &PlatformDispatcher,
    connector: &C,
    reporter: &impl ProgressReporter,
    request: &GatherRequest,
    captured_at: impl FnOnce() -> DateTime<Tz>,
) -> Result<PathBuf>
where
    C: RemoteConnector,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let resolution =
        resolve_gather_target(states, configs, dispatcher, &request.manual, reporter).await?;
    debug!(source = ?resolution.source, target = ?resolution.target, "gather target resolved");

    let descriptor = SessionDescriptor {
        target: resolution.target,
        output_dir: request.output_dir.clone(),
        key_paths: request.key_paths.clone(),
        timeout: request.timeout,
    };
    reporter.step("Pulling debug logs from the bootstrap machine");
    let bundle = collect_log_bundle(connector, reporter, &descriptor, captured_at).await?;
    reporter.success(&format!(
        "Bootstrap gather logs captured here {:?}",
        bundle.display().to_string()
    ));
    Ok(bundle)
}
