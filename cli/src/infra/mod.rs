//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: filesystem access, reading
//! the installation directory, and SSH sessions.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod fs;
pub mod ssh;
pub mod state;
