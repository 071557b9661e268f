//! AWS: the bootstrap instance has a public IP, masters are reached on their
//! private IPs through it.

use super::{AddressExtractor, AddressField};
use crate::domain::error::ExtractError;
use crate::domain::tfstate::TerraformState;

const BOOTSTRAP: AddressField<'static> = AddressField {
    module: "module.bootstrap",
    kind: "aws_instance",
    name: "bootstrap",
    pointer: "/public_ip",
};

const MASTERS: AddressField<'static> = AddressField {
    module: "module.masters",
    kind: "aws_instance",
    name: "master",
    pointer: "/private_ip",
};

pub struct AwsAddresses;

impl AddressExtractor for AwsAddresses {
    fn bootstrap_address(&self, state: &TerraformState) -> Result<String, ExtractError> {
        BOOTSTRAP.first(state)
    }

    fn control_plane_addresses(&self, state: &TerraformState) -> Result<Vec<String>, ExtractError> {
        MASTERS.all(state)
    }
}
