//! OpenStack: the bootstrap host is reached through its floating IP, masters
//! through the first fixed IP of their ports.

use super::{AddressExtractor, AddressField};
use crate::domain::error::ExtractError;
use crate::domain::tfstate::TerraformState;

const BOOTSTRAP: AddressField<'static> = AddressField {
    module: "module.bootstrap",
    kind: "openstack_networking_floatingip_v2",
    name: "bootstrap_fip",
    pointer: "/address",
};

const MASTERS: AddressField<'static> = AddressField {
    module: "module.topology",
    kind: "openstack_networking_port_v2",
    name: "masters",
    pointer: "/all_fixed_ips/0",
};

pub struct OpenStackAddresses;

impl AddressExtractor for OpenStackAddresses {
    fn bootstrap_address(&self, state: &TerraformState) -> Result<String, ExtractError> {
        BOOTSTRAP.first(state)
    }

    fn control_plane_addresses(&self, state: &TerraformState) -> Result<Vec<String>, ExtractError> {
        MASTERS.all(state)
    }
}
