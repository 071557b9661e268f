//! Per-platform strategies for reading host addresses out of Terraform state.
//!
//! Each strategy knows which resources its platform's Terraform modules create
//! and where the bootstrap and control plane addresses live in them. All
//! strategies take the state by shared reference and never modify it.

pub mod aws;
pub mod azure;
pub mod libvirt;
pub mod openstack;

pub use aws::AwsAddresses;
pub use azure::AzureAddresses;
pub use libvirt::LibvirtAddresses;
pub use openstack::OpenStackAddresses;

use crate::domain::error::ExtractError;
use crate::domain::tfstate::TerraformState;

/// SSH port used unless a platform says otherwise.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Extracts bootstrap and control plane addresses for one platform.
pub trait AddressExtractor {
    /// Address of the bootstrap host.
    ///
    /// # Errors
    ///
    /// Returns an error if the bootstrap resource or its address is missing.
    fn bootstrap_address(&self, state: &TerraformState) -> Result<String, ExtractError>;

    /// Addresses of all control plane hosts.
    ///
    /// # Errors
    ///
    /// Returns an error if the control plane resource is missing or any of
    /// its instances has no address.
    fn control_plane_addresses(&self, state: &TerraformState) -> Result<Vec<String>, ExtractError>;

    /// Port the bootstrap host's SSH daemon is reachable on.
    fn ssh_port(&self) -> u16 {
        DEFAULT_SSH_PORT
    }
}

/// Location of an address inside a resource's instance attributes.
pub(crate) struct AddressField<'a> {
    pub module: &'a str,
    pub kind: &'a str,
    pub name: &'a str,
    pub pointer: &'a str,
}

impl AddressField<'_> {
    /// The field's value on the first instance.
    pub(crate) fn first(&self, state: &TerraformState) -> Result<String, ExtractError> {
        let resource = state.lookup_resource(self.module, self.kind, self.name)?;
        resource
            .string_attribute(0, self.pointer)
            .map(ToString::to_string)
    }

    /// The field's value on every instance, failing if any instance lacks it.
    pub(crate) fn all(&self, state: &TerraformState) -> Result<Vec<String>, ExtractError> {
        let resource = state.lookup_resource(self.module, self.kind, self.name)?;
        let mut addresses = Vec::with_capacity(resource.instances.len());
        let mut failures = Vec::new();
        for index in 0..resource.instances.len() {
            match resource.string_attribute(index, self.pointer) {
                Ok(addr) => addresses.push(addr.to_string()),
                Err(e) => failures.push(e),
            }
        }
        if failures.is_empty() {
            Ok(addresses)
        } else {
            Err(ExtractError::Incomplete {
                address: resource.address(),
                failures,
            })
        }
    }
}
