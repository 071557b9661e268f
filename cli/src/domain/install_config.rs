//! The slice of the install config needed to pick an extraction strategy.

use std::collections::BTreeMap;

use gather_common::Platform;
use serde::Deserialize;
use serde_yaml::Value;

/// Name of the install config inside the installation directory.
pub const INSTALL_CONFIG_FILE_NAME: &str = "install-config.yaml";

/// Installer asset store. It keeps the install config after the YAML file
/// has been consumed by `create cluster`.
pub const ASSET_STATE_FILE_NAME: &str = ".openshift_install_state.json";

/// Key of the install config asset inside the asset store.
pub const INSTALL_CONFIG_ASSET_KEY: &str = "*installconfig.InstallConfig";

/// Install config, reduced to its `platform` section.
///
/// `platform` is a mapping with a single key naming the provider, e.g.
/// `platform: {aws: {region: us-east-1}}`. Everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstallConfig {
    #[serde(default)]
    pub platform: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct InstallConfigAsset {
    #[serde(default)]
    config: Option<InstallConfig>,
}

impl InstallConfig {
    /// The install config persisted in an asset store document, or `None`
    /// if the store holds no install config.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not an asset store document or the
    /// install config entry is malformed.
    pub fn from_asset_state(json: &str) -> serde_json::Result<Option<Self>> {
        let mut assets: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let Some(asset) = assets.remove(INSTALL_CONFIG_ASSET_KEY) else {
            return Ok(None);
        };
        let asset: InstallConfigAsset = serde_json::from_value(asset)?;
        Ok(asset.config)
    }

    /// The configured provider, or `None` if no platform section is set.
    #[must_use]
    pub fn platform(&self) -> Option<Platform> {
        self.platform.keys().next().map(|name| Platform::from(name.clone()))
    }
}
