//! Read-only view of a Terraform state file (format version 4).
//!
//! Only the parts needed to locate host addresses are modelled: resources are
//! looked up by `(module, type, name)` and instance attributes are addressed
//! with JSON pointers.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::error::ExtractError;

/// Name of the state file inside the installation directory.
pub const STATE_FILE_NAME: &str = "terraform.tfstate";

/// Parsed Terraform state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TerraformState {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub resources: Vec<StateResource>,
}

/// A single resource block. Root-module resources have an empty `module`.
#[derive(Debug, Clone, Deserialize)]
pub struct StateResource {
    #[serde(default)]
    pub module: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub instances: Vec<ResourceInstance>,
}

/// One instance of a resource (`count` / `for_each` produce several).
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceInstance {
    #[serde(default)]
    pub index_key: Option<Value>,
    #[serde(default)]
    pub attributes: Value,
}

fn default_mode() -> String {
    "managed".to_string()
}

impl TerraformState {
    /// Parse state from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid state document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Find the managed resource `module.type.name`.
    ///
    /// Pass an empty `module` for resources in the root module.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::ResourceNotFound`] if no such resource exists.
    pub fn lookup_resource(
        &self,
        module: &str,
        kind: &str,
        name: &str,
    ) -> Result<&StateResource, ExtractError> {
        self.resources
            .iter()
            .find(|r| r.mode == "managed" && r.module == module && r.kind == kind && r.name == name)
            .ok_or_else(|| ExtractError::ResourceNotFound {
                address: resource_address(module, kind, name),
            })
    }
}

impl StateResource {
    /// Terraform address, e.g. `module.bootstrap.aws_instance.bootstrap`.
    #[must_use]
    pub fn address(&self) -> String {
        resource_address(&self.module, &self.kind, &self.name)
    }

    /// String attribute of instance `index` at `pointer`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::NoInstances`] if the resource has no instances
    /// and [`ExtractError::MissingAttribute`] if the instance is missing or
    /// the value is absent or not a string.
    pub fn string_attribute(&self, index: usize, pointer: &str) -> Result<&str, ExtractError> {
        if self.instances.is_empty() {
            return Err(ExtractError::NoInstances {
                address: self.address(),
            });
        }
        self.instances
            .get(index)
            .and_then(|inst| inst.string_attribute(pointer))
            .ok_or_else(|| ExtractError::MissingAttribute {
                address: self.address(),
                index,
                pointer: pointer.to_string(),
            })
    }
}

impl ResourceInstance {
    /// String value at `pointer` (RFC 6901) within the instance attributes.
    #[must_use]
    pub fn string_attribute(&self, pointer: &str) -> Option<&str> {
        self.attributes.pointer(pointer).and_then(Value::as_str)
    }
}

fn resource_address(module: &str, kind: &str, name: &str) -> String {
    if module.is_empty() {
        format!("{kind}.{name}")
    } else {
        format!("{module}.{kind}.{name}")
    }
}
