//! Persisted view preferences
//!
//! The web client kept filter/view preferences in implicit browser
//! storage. Here they are an explicit struct loaded once at startup and
//! written through `save` whenever a command changes them, so the filter
//! engine itself stays free of I/O.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::engine::ArchiveView;
use crate::error::Result;
use crate::render::ViewMode;

/// Sticky view state restored on the next invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewPrefs {
    pub view_mode: ViewMode,
    #[serde(flatten)]
    pub view: ArchiveView,
}

impl ViewPrefs {
    pub async fn load(path: &Path) -> Self {
        match fs::read_to_string(path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }
}

pub fn default_prefs_path() -> PathBuf {
    crate::config::default_config_dir().join("view-prefs.json")
}
