//! Print log API DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::common::PrintLogEntry;

/// Query parameters for GET /print-log
///
/// Unlike the archive list, log filtering runs server-side; unset fields
/// are omitted from the query string entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrintLogQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printer_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    pub limit: u32,
    pub offset: u32,
}

/// One server-side page of the print log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintLogPage {
    pub entries: Vec<PrintLogEntry>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}
