//! Integration tests for bootstrap-gather
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them reach a real remote host.

mod cli_tests;
