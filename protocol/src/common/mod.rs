pub mod archive;
pub mod backup;
pub mod log;
pub mod plug;

pub use archive::*;
pub use backup::*;
pub use log::*;
pub use plug::*;
