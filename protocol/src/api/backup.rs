//! Backup configuration API DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use crate::common::BackupSettings;

/// Update backup settings
///
/// Used for PUT /settings/backup. Partial update: unset fields keep their
/// server-side value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBackupSettingsRequest {
    pub enabled: Option<bool>,
    #[validate(range(min = 1, max = 720))]
    pub interval_hours: Option<u32>,
    #[validate(range(min = 1, max = 365))]
    pub keep_copies: Option<u32>,
    #[validate(length(min = 1, max = 4096))]
    pub target_dir: Option<String>,
}
