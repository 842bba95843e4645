//! API DTOs module
//!
//! Request and response types organized by domain:
//! - `archive`: archive listing and per-archive mutations
//! - `backup`: backup configuration
//! - `log`: server-side filtered print log
//! - `plug`: smart plug control

pub mod archive;
pub mod backup;
pub mod log;
pub mod plug;

pub use archive::*;
pub use backup::*;
pub use log::*;
pub use plug::*;
