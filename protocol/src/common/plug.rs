//! Smart plug data structures

use serde::{Deserialize, Serialize};

/// A network-controllable smart plug attached to a printer or accessory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartPlug {
    pub id: i64,
    pub name: String,
    pub on: bool,
    pub power_w: Option<f64>,
    pub printer_id: Option<i64>,
}
