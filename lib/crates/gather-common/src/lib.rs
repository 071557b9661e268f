//! Types shared between bootstrap-gather crates.

pub mod address;
pub mod platform;

pub use address::{AddressError, parse_host_address, validate_host_address};
pub use platform::Platform;
