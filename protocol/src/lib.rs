//! Shared data transfer objects for the PrintBay farm API
//!
//! All response shapes consumed by the CLI/SDK are declared here so the
//! transport layer and the archive engine never depend on loosely typed
//! JSON values.

pub mod api;
pub mod common;

pub use api::*;
pub use common::*;
