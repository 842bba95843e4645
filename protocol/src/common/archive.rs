//! Archive-related data structures
//!
//! An archive is the persisted record of one print job and its associated
//! files. The backend owns these records; clients treat them as immutable
//! values once fetched and go through the API for every mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final state of a print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintStatus {
    Completed,
    Failed,
    Aborted,
    Printing,
}

impl PrintStatus {
    /// Failed and aborted prints are both treated as unsuccessful.
    pub fn is_failure(&self) -> bool {
        matches!(self, PrintStatus::Failed | PrintStatus::Aborted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrintStatus::Completed => "completed",
            PrintStatus::Failed => "failed",
            PrintStatus::Aborted => "aborted",
            PrintStatus::Printing => "printing",
        }
    }
}

/// One archived print job.
///
/// `material`, `colors` and `tags` are comma-separated strings exactly as
/// the backend stores them; consumers split and trim them at use time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Archive {
    pub id: i64,
    pub name: String,
    pub filename: Option<String>,
    pub status: PrintStatus,
    pub printer_id: Option<i64>,
    pub printer_name: Option<String>,
    pub material: Option<String>,
    pub colors: Option<String>,
    pub filament_used_g: Option<f64>,
    pub print_time_secs: Option<i64>,
    pub layer_count: Option<i64>,
    pub file_size: i64,
    pub favorite: bool,
    pub tags: Option<String>,
    pub project_id: Option<i64>,
    pub has_source_file: bool,
    pub has_timelapse: bool,
    pub photo_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project entry for list views and assignment pickers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectListItem {
    pub id: i64,
    pub name: String,
    pub archive_count: u32,
}

/// Tag with its usage count across the archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    pub name: String,
    pub count: u32,
}
