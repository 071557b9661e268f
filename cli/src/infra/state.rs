//! Infrastructure implementations of the `InfraStateStore` and
//! `InstallConfigStore` ports.
//!
//! Both read files from the installation directory on tokio's blocking pool.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gather_common::Platform;
use tracing::debug;

use crate::application::ports::{InfraStateStore, InstallConfigStore};
use crate::domain::error::GatherError;
use crate::domain::install_config::{
    ASSET_STATE_FILE_NAME, INSTALL_CONFIG_FILE_NAME, InstallConfig,
};
use crate::domain::tfstate::{STATE_FILE_NAME, TerraformState};

/// Terraform state file: implements `InfraStateStore` for the infra layer.
pub struct TerraformStateFile {
    path: PathBuf,
}

impl TerraformStateFile {
    /// State file at its well-known name inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self::with_path(dir.join(STATE_FILE_NAME))
    }

    /// State file at an explicit path (used in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Synchronous load, used internally by `load_async` via `spawn_blocking`.
    fn load_sync(&self) -> Result<TerraformState, GatherError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GatherError::StateUnavailable {
                    path: self.path.clone(),
                });
            }
            Err(e) => {
                return Err(GatherError::StateUnreadable {
                    path: self.path.clone(),
                    source: e.into(),
                });
            }
        };
        TerraformState::from_json(&content).map_err(|e| GatherError::StateUnreadable {
            path: self.path.clone(),
            source: e.into(),
        })
    }
}

impl InfraStateStore for TerraformStateFile {
    async fn load_async(&self) -> Result<TerraformState> {
        let path = self.path.clone();
        let state = tokio::task::spawn_blocking(move || {
            TerraformStateFile::with_path(path).load_sync()
        })
        .await
        .context("state load task panicked")??;
        Ok(state)
    }
}

/// Install config source: implements `InstallConfigStore` for the infra layer.
///
/// Reads `install-config.yaml` when present. The installer consumes that file
/// while creating the cluster, so otherwise the copy kept in the asset store
/// is used.
#[derive(Debug, Clone)]
pub struct InstallConfigFile {
    path: PathBuf,
    asset_state: Option<PathBuf>,
}

impl InstallConfigFile {
    /// Install config and asset store at their well-known names inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(INSTALL_CONFIG_FILE_NAME),
            asset_state: Some(dir.join(ASSET_STATE_FILE_NAME)),
        }
    }

    /// Install config at an explicit path, with no asset store fallback.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            asset_state: None,
        }
    }

    fn load_sync(&self) -> Result<InstallConfig> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_yaml::from_str(&content)
                .with_context(|| format!("cannot parse {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => match &self.asset_state {
                Some(asset_state) => Self::load_asset_state(&self.path, asset_state),
                None => Err(e).with_context(|| format!("cannot read {}", self.path.display())),
            },
            Err(e) => Err(e).with_context(|| format!("cannot read {}", self.path.display())),
        }
    }

    fn load_asset_state(yaml: &Path, asset_state: &Path) -> Result<InstallConfig> {
        let content = match std::fs::read_to_string(asset_state) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                anyhow::bail!(
                    "neither {} nor {} exists",
                    yaml.display(),
                    asset_state.display()
                );
            }
            Err(e) => {
                return Err(e).with_context(|| format!("cannot read {}", asset_state.display()));
            }
        };
        debug!(path = %asset_state.display(), "reading install config from asset store");
        InstallConfig::from_asset_state(&content)
            .with_context(|| format!("cannot parse {}", asset_state.display()))?
            .ok_or_else(|| anyhow::anyhow!("{} holds no install config", asset_state.display()))
    }

    fn platform_sync(&self) -> Result<Platform> {
        self.load_sync()?
            .platform()
            .ok_or_else(|| anyhow::anyhow!("install config has no platform section"))
    }
}

impl InstallConfigStore for InstallConfigFile {
    async fn platform_async(&self) -> Result<Platform> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.platform_sync())
            .await
            .context("install config load task panicked")?
    }
}
