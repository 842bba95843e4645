//! Test utilities and helpers for unit tests
//!
//! Fixture builders for archive records so individual tests only spell
//! out the fields they actually assert on.

#[cfg(test)]
pub mod test_helpers {
    use chrono::{DateTime, TimeZone, Utc};
    use printbay_protocol::{Archive, PrintStatus};

    /// Build an archive with sensible defaults and the given status.
    pub fn archive(id: i64, name: &str, status: PrintStatus) -> Archive {
        let created_at = Utc.with_ymd_and_hms(2026, 8, 10, 9, 0, 0).unwrap();
        Archive {
            id,
            name: name.to_string(),
            filename: Some(format!("{}.gcode", name)),
            status,
            printer_id: Some(1),
            printer_name: Some("voron-1".to_string()),
            material: Some("PLA".to_string()),
            colors: Some("black".to_string()),
            filament_used_g: Some(12.5),
            print_time_secs: Some(3600),
            layer_count: Some(220),
            file_size: 1_048_576,
            favorite: false,
            tags: None,
            project_id: None,
            has_source_file: false,
            has_timelapse: false,
            photo_count: 0,
            created_at,
            updated_at: created_at,
        }
    }

    /// Build a completed archive created at a specific instant.
    pub fn archive_at(id: i64, name: &str, created_at: DateTime<Utc>) -> Archive {
        Archive {
            created_at,
            updated_at: created_at,
            ..archive(id, name, PrintStatus::Completed)
        }
    }
}
