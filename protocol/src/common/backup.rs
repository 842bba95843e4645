//! Backup configuration data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-side backup settings for the farm database and archive files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupSettings {
    pub enabled: bool,
    pub interval_hours: u32,
    pub keep_copies: u32,
    pub target_dir: String,
    pub last_backup_at: Option<DateTime<Utc>>,
}
