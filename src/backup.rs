//! Backup configuration and archive metadata export

use reqwest::Method;
use std::path::Path;
use tokio::fs;
use validator::Validate;

use printbay_protocol::{
    api::UpdateBackupSettingsRequest,
    Archive, BackupSettings,
};

use crate::client::ApiClient;
use crate::error::Result;

/// Backup settings operations against the farm API.
pub struct BackupService<'a, C: ApiClient> {
    client: &'a C,
}

impl<'a, C: ApiClient> BackupService<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub async fn settings(&self) -> Result<BackupSettings> {
        let response = self
            .client
            .request::<(), BackupSettings>(Method::GET, "settings/backup", None)
            .await?;
        response.into_data()
    }

    /// Partial update; unset fields keep their server-side value.
    pub async fn update(&self, request: &UpdateBackupSettingsRequest) -> Result<BackupSettings> {
        request.validate()?;
        let response = self
            .client
            .request::<UpdateBackupSettingsRequest, BackupSettings>(
                Method::PUT,
                "settings/backup",
                Some(request),
            )
            .await?;
        response.into_data()
    }
}

/// Write the given (already filtered) archive metadata as pretty JSON.
///
/// The export respects the caller's active view: whatever slice the
/// engine produced is what lands in the file.
pub async fn export_archives(archives: &[Archive], output: &Path) -> Result<usize> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_string_pretty(archives)?;
    fs::write(output, content).await?;
    Ok(archives.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::MockApiClient;
    use crate::tests::utils::test_helpers::archive;
    use printbay_protocol::PrintStatus;
    use serde_json::json;

    #[tokio::test]
    async fn test_settings_round_trip() {
        let client = MockApiClient::new();
        client.add_response(
            "settings/backup",
            json!({
                "enabled": true,
                "interval_hours": 24,
                "keep_copies": 7,
                "target_dir": "/var/backups/printbay",
                "last_backup_at": "2026-08-19T03:00:00Z"
            }),
        );

        let service = BackupService::new(&client);
        let settings = service.settings().await.unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.keep_copies, 7);
    }

    #[tokio::test]
    async fn test_update_validates_ranges() {
        let client = MockApiClient::new();
        let service = BackupService::new(&client);

        let request = UpdateBackupSettingsRequest {
            interval_hours: Some(0),
            ..UpdateBackupSettingsRequest::default()
        };
        assert!(service.update(&request).await.is_err());
        assert_eq!(client.request_count("settings/backup"), 0);
    }

    #[tokio::test]
    async fn test_export_writes_filtered_slice() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("export/archives.json");

        let archives = vec![
            archive(1, "benchy", PrintStatus::Completed),
            archive(2, "vase", PrintStatus::Failed),
        ];
        let count = export_archives(&archives, &output).await.unwrap();
        assert_eq!(count, 2);

        let content = std::fs::read_to_string(&output).unwrap();
        let parsed: Vec<Archive> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "benchy");
    }
}
