//! Unit tests for bootstrap-gather
//!
//! These tests use mocked ports and run fast without network access.

mod address_resolution;
mod log_bundle_service;
