//! Command implementations

pub mod gather;
