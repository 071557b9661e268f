//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod addresses;
pub mod bundle;
pub mod credentials;
pub mod error;
pub mod install_config;
pub mod platforms;
pub mod tfstate;

pub use addresses::{GatherTarget, ManualAddresses};
pub use credentials::Credential;
pub use error::{ExtractError, GatherError, ResolveError};
pub use install_config::InstallConfig;
pub use tfstate::TerraformState;
