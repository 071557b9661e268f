//! Azure: the bootstrap VM sits behind its own public IP and answers SSH on
//! port 2200, masters are addressed by their NIC's private IP.

use super::{AddressExtractor, AddressField};
use crate::domain::error::ExtractError;
use crate::domain::tfstate::TerraformState;

/// SSH port exposed by the Azure bootstrap host.
pub const AZURE_SSH_PORT: u16 = 2200;

const BOOTSTRAP: AddressField<'static> = AddressField {
    module: "module.bootstrap",
    kind: "azurerm_public_ip",
    name: "bootstrap_public_ip",
    pointer: "/ip_address",
};

const MASTERS: AddressField<'static> = AddressField {
    module: "module.master",
    kind: "azurerm_network_interface",
    name: "master",
    pointer: "/private_ip_address",
};

pub struct AzureAddresses;

impl AddressExtractor for AzureAddresses {
    fn bootstrap_address(&self, state: &TerraformState) -> Result<String, ExtractError> {
        BOOTSTRAP.first(state)
    }

    fn control_plane_addresses(&self, state: &TerraformState) -> Result<Vec<String>, ExtractError> {
        MASTERS.all(state)
    }

    fn ssh_port(&self) -> u16 {
        AZURE_SSH_PORT
    }
}
