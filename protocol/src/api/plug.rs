//! Smart plug API DTOs

use serde::{Deserialize, Serialize};

pub use crate::common::SmartPlug;

/// List plugs response for GET /plugs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlugListResponse {
    pub plugs: Vec<SmartPlug>,
}

/// Switch one plug on or off
///
/// Used for PUT /plugs/{id}/state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPlugStateRequest {
    pub on: bool,
}
