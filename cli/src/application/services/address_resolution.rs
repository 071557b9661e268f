//! Application service: pick the platform's extraction strategy and run it.
//!
//! Strategies live in a registry keyed by [`Platform`], so adding a provider
//! means registering one more [`AddressExtractor`]; dispatch itself does not
//! change.

use std::collections::HashMap;
use std::fmt;

use gather_common::{AddressError, Platform, validate_host_address};
use tracing::{debug, warn};

use crate::domain::error::{ExtractError, ResolveError};
use crate::domain::platforms::{
    AddressExtractor, AwsAddresses, AzureAddresses, LibvirtAddresses, OpenStackAddresses,
};
use crate::domain::tfstate::TerraformState;

type Strategy = Box<dyn AddressExtractor + Send + Sync>;

/// Addresses read from state by a platform strategy.
#[derive(Debug)]
pub struct ResolvedHosts {
    pub bootstrap: String,
    pub port: u16,
    /// Empty when `control_plane_error` is set.
    pub control_plane: Vec<String>,
    /// Why the control plane list could not be read, if it could not.
    pub control_plane_error: Option<ExtractError>,
}

/// Registry of per-platform address extraction strategies.
pub struct PlatformDispatcher {
    strategies: HashMap<Platform, Strategy>,
}

impl PlatformDispatcher {
    /// A dispatcher with no strategies registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// A dispatcher knowing every built-in platform.
    #[must_use]
    pub fn with_builtin_platforms() -> Self {
        let mut dispatcher = Self::empty();
        dispatcher
            .register(Platform::Aws, AwsAddresses)
            .register(Platform::Azure, AzureAddresses)
            .register(Platform::Libvirt, LibvirtAddresses)
            .register(Platform::OpenStack, OpenStackAddresses);
        dispatcher
    }

    /// Register `strategy` for `platform`, replacing any existing one.
    pub fn register(
        &mut self,
        platform: Platform,
        strategy: impl AddressExtractor + Send + Sync + 'static,
    ) -> &mut Self {
        self.strategies.insert(platform, Box::new(strategy));
        self
    }

    /// Whether a strategy is registered for `platform`.
    #[must_use]
    pub fn supports(&self, platform: &Platform) -> bool {
        self.strategies.contains_key(platform)
    }

    /// Read the bootstrap address, SSH port and control plane addresses for
    /// `platform` out of `state`.
    ///
    /// A failure to read the control plane is not fatal: it is logged and
    /// reported in [`ResolvedHosts::control_plane_error`] with an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnsupportedPlatform`] if no strategy is
    /// registered, and [`ResolveError::BootstrapExtraction`] if the strategy
    /// cannot find the bootstrap address or finds one that is not a valid
    /// host address. An invalid control plane address fails the control
    /// plane lookup like a missing one. In the latter case the control
    /// plane is never queried.
    pub fn resolve(
        &self,
        platform: &Platform,
        state: &TerraformState,
    ) -> Result<ResolvedHosts, ResolveError> {
        let strategy =
            self.strategies
                .get(platform)
                .ok_or_else(|| ResolveError::UnsupportedPlatform {
                    platform: platform.to_string(),
                })?;
        let port = strategy.ssh_port();

        let bootstrap = strategy
            .bootstrap_address(state)
            .and_then(|address| check_bootstrap(&address).map(|()| address))
            .map_err(ResolveError::BootstrapExtraction)?;
        debug!(%platform, %bootstrap, port, "bootstrap address resolved");

        let control_plane = strategy
            .control_plane_addresses(state)
            .and_then(|addresses| check_control_plane(&addresses).map(|()| addresses));
        let (control_plane, control_plane_error) = match control_plane {
            Ok(addresses) => {
                debug!(%platform, count = addresses.len(), "control plane addresses resolved");
                (addresses, None)
            }
            Err(e) => {
                warn!(%platform, error = %e, "failed to read control plane addresses from state");
                (Vec::new(), Some(e))
            }
        };

        Ok(ResolvedHosts {
            bootstrap,
            port,
            control_plane,
            control_plane_error,
        })
    }
}

/// Rejects values that are unsafe on the remote command line. An empty
/// bootstrap is left to `GatherTarget::new`.
fn check_bootstrap(address: &str) -> Result<(), ExtractError> {
    match validate_host_address(address) {
        Ok(()) | Err(AddressError::Empty) => Ok(()),
        Err(e) => Err(ExtractError::InvalidAddress(e)),
    }
}

fn check_control_plane(addresses: &[String]) -> Result<(), ExtractError> {
    addresses
        .iter()
        .try_for_each(|address| validate_host_address(address))
        .map_err(ExtractError::InvalidAddress)
}

impl Default for PlatformDispatcher {
    fn default() -> Self {
        Self::with_builtin_platforms()
    }
}

impl fmt::Debug for PlatformDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut platforms: Vec<&str> = self.strategies.keys().map(Platform::name).collect();
        platforms.sort_unstable();
        f.debug_struct("PlatformDispatcher")
            .field("platforms", &platforms)
            .finish()
    }
}
