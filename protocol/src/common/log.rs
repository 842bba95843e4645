//! Print log data structures
//!
//! The log is a separate, potentially much larger dataset than the loaded
//! archive list, so filtering and pagination happen server-side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::archive::PrintStatus;

/// One print log entry as returned by the log listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintLogEntry {
    pub id: i64,
    pub archive_id: Option<i64>,
    pub job_name: String,
    pub printer_name: String,
    pub username: Option<String>,
    pub status: PrintStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_secs: Option<i64>,
}
