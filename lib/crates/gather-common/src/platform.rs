use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Infrastructure provider an installation was provisioned on.
///
/// Unknown provider names are kept verbatim in [`Platform::Other`] so they can
/// be reported back to the operator instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Aws,
    Azure,
    Libvirt,
    OpenStack,
    Other(String),
}

impl Platform {
    /// Canonical lowercase name, as written in the install config.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Platform::Aws => "aws",
            Platform::Azure => "azure",
            Platform::Libvirt => "libvirt",
            Platform::OpenStack => "openstack",
            Platform::Other(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Platform::from(s.to_string()))
    }
}

impl From<String> for Platform {
    fn from(name: String) -> Self {
        match name.as_str() {
            "aws" => Platform::Aws,
            "azure" => Platform::Azure,
            "libvirt" => Platform::Libvirt,
            "openstack" => Platform::OpenStack,
            _ => Platform::Other(name),
        }
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.name().to_string()
    }
}
