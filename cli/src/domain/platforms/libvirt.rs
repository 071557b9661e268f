//! libvirt: addresses come from the domain's first network interface.

use super::{AddressExtractor, AddressField};
use crate::domain::error::ExtractError;
use crate::domain::tfstate::TerraformState;

const FIRST_INTERFACE_ADDRESS: &str = "/network_interface/0/addresses/0";

const BOOTSTRAP: AddressField<'static> = AddressField {
    module: "module.bootstrap",
    kind: "libvirt_domain",
    name: "bootstrap",
    pointer: FIRST_INTERFACE_ADDRESS,
};

const MASTERS: AddressField<'static> = AddressField {
    module: "",
    kind: "libvirt_domain",
    name: "master",
    pointer: FIRST_INTERFACE_ADDRESS,
};

pub struct LibvirtAddresses;

impl AddressExtractor for LibvirtAddresses {
    fn bootstrap_address(&self, state: &TerraformState) -> Result<String, ExtractError> {
        BOOTSTRAP.first(state)
    }

    fn control_plane_addresses(&self, state: &TerraformState) -> Result<Vec<String>, ExtractError> {
        MASTERS.all(state)
    }
}
