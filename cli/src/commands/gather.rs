//! `bootstrap-gather gather`: collect debugging data from a failed install.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::{Args, Subcommand};
use gather_common::parse_host_address;

use crate::app::AppContext;
use crate::application::services::address_resolution::PlatformDispatcher;
use crate::application::services::gather_bootstrap::{GatherRequest, gather_bootstrap};
use crate::domain::ManualAddresses;
use crate::infra::ssh::Ssh2Connector;
use crate::infra::state::{InstallConfigFile, TerraformStateFile};

#[derive(Subcommand)]
pub enum GatherCommand {
    /// Gather debugging data for a failing-to-bootstrap control plane
    ///
    /// Host addresses are read from the Terraform state in --dir when it is
    /// available. Otherwise, or when the platform is not supported, --bootstrap
    /// and at least one --master are required.
    Bootstrap(BootstrapArgs),
}

/// Arguments for `gather bootstrap`.
#[derive(Args, Debug, Default)]
pub struct BootstrapArgs {
    /// Hostname or IP of the bootstrap host
    #[arg(long, value_name = "HOST", value_parser = parse_host_address)]
    pub bootstrap: Option<String>,

    /// Hostname or IP of a control plane host (repeatable)
    #[arg(long = "master", value_name = "HOST", value_parser = parse_host_address)]
    pub masters: Vec<String>,

    /// Private SSH key to authenticate with (repeatable; default: agent and ~/.ssh keys)
    #[arg(long = "key", value_name = "PATH")]
    pub keys: Vec<PathBuf>,

    /// Directory to write the log bundle to [default: --dir]
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Connect and I/O timeout in seconds
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

impl BootstrapArgs {
    fn into_request(self, dir: &std::path::Path) -> GatherRequest {
        GatherRequest {
            manual: ManualAddresses {
                bootstrap: self.bootstrap,
                control_plane: self.masters,
            },
            output_dir: self.output_dir.unwrap_or_else(|| dir.to_path_buf()),
            key_paths: self.keys,
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}

/// Run a `gather` subcommand.
///
/// # Errors
///
/// Returns an error if the hosts cannot be determined or the gather session
/// fails.
pub async fn run(cmd: GatherCommand, app: &AppContext) -> Result<()> {
    match cmd {
        GatherCommand::Bootstrap(args) => bootstrap(args, app).await,
    }
}

async fn bootstrap(args: BootstrapArgs, app: &AppContext) -> Result<()> {
    let request = args.into_request(&app.dir);
    let reporter = app.terminal_reporter();

    gather_bootstrap(
        &TerraformStateFile::in_dir(&app.dir),
        &InstallConfigFile::in_dir(&app.dir),
        &PlatformDispatcher::with_builtin_platforms(),
        &Ssh2Connector::new(),
        &reporter,
        &request,
        Local::now,
    )
    .await?;
    Ok(())
}
