//! Shared test support: mock API client and fixture builders.

pub mod mocks;
pub mod utils;
