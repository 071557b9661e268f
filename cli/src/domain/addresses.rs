//! Resolved gather targets and the manual address override.

use crate::domain::error::GatherError;
use crate::domain::platforms::DEFAULT_SSH_PORT;

/// Hosts a gather session talks to.
///
/// Always carries a non-empty bootstrap address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatherTarget {
    bootstrap: String,
    port: u16,
    control_plane: Vec<String>,
}

impl GatherTarget {
    /// Build a target, rejecting an empty bootstrap address.
    ///
    /// # Errors
    ///
    /// Returns [`GatherError::EmptyBootstrapAddress`] if `bootstrap` is empty.
    pub fn new(
        bootstrap: impl Into<String>,
        port: u16,
        control_plane: Vec<String>,
    ) -> Result<Self, GatherError> {
        let bootstrap = bootstrap.into();
        if bootstrap.is_empty() {
            return Err(GatherError::EmptyBootstrapAddress);
        }
        Ok(Self {
            bootstrap,
            port,
            control_plane,
        })
    }

    #[must_use]
    pub fn bootstrap(&self) -> &str {
        &self.bootstrap
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn control_plane(&self) -> &[String] {
        &self.control_plane
    }

    /// `host:port`, bracketing IPv6 literals.
    #[must_use]
    pub fn endpoint(&self) -> String {
        if self.bootstrap.contains(':') && !self.bootstrap.starts_with('[') {
            format!("[{}]:{}", self.bootstrap, self.port)
        } else {
            format!("{}:{}", self.bootstrap, self.port)
        }
    }
}

/// Addresses supplied by the operator for use when state cannot be used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualAddresses {
    pub bootstrap: Option<String>,
    pub control_plane: Vec<String>,
}

impl ManualAddresses {
    /// Turn the operator's addresses into a target on the default SSH port.
    ///
    /// # Errors
    ///
    /// Returns [`GatherError::MissingManualAddresses`] unless a non-empty
    /// bootstrap address and at least one control plane address were given.
    pub fn resolve(&self) -> Result<GatherTarget, GatherError> {
        let bootstrap = self
            .bootstrap
            .as_deref()
            .filter(|b| !b.is_empty())
            .ok_or(GatherError::MissingManualAddresses)?;
        if self.control_plane.is_empty() {
            return Err(GatherError::MissingManualAddresses);
        }
        GatherTarget::new(bootstrap, DEFAULT_SSH_PORT, self.control_plane.clone())
    }
}
