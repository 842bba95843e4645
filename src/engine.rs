//! Archive filter/sort/collection engine
//!
//! Pure derivation of the visible archive slice: given the full fetched
//! list and the current view state, produce a fresh ordered subset. The
//! only ambient input is `now`, which time-windowed collections depend on;
//! callers pass it in so the function stays deterministic under test.

use chrono::{DateTime, Datelike, Duration, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use printbay_protocol::Archive;

/// Named categorical filter applied before the independent predicates.
/// Exactly one is active at a time; never persisted server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    #[default]
    All,
    /// Created within the last 24 hours.
    Recent,
    /// Created within the last 7 days.
    Week,
    /// Created in the current calendar month.
    Month,
    Favorites,
    /// Failed or aborted prints.
    Failed,
    /// Display name shared with at least one other archive.
    Duplicates,
}

/// How a multi-color selection matches an archive's color list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMatch {
    /// At least one selected color present.
    #[default]
    Any,
    /// Every selected color present.
    All,
}

/// File-type class derived from the archive filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Gcode,
    Source,
}

/// Classify a filename as sliced GCODE or a source project file.
///
/// A missing filename cannot assert GCODE-readiness, so it classifies as
/// Source.
pub fn classify_file(filename: Option<&str>) -> FileKind {
    match filename {
        Some(name) => {
            let lower = name.to_lowercase();
            if lower.ends_with(".gcode") || lower.contains(".gcode.") {
                FileKind::Gcode
            } else {
                FileKind::Source
            }
        }
        None => FileKind::Source,
    }
}

/// Six-way total order over the archive list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    NameAsc,
    NameDesc,
    SizeAsc,
    SizeDesc,
}

/// Conjunction of independently toggleable predicates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSet {
    pub search: Option<String>,
    pub printer_id: Option<i64>,
    pub material: Option<String>,
    pub colors: Vec<String>,
    pub color_match: ColorMatch,
    pub favorites_only: bool,
    pub hide_failed: bool,
    pub tag: Option<String>,
    pub file_kind: Option<FileKind>,
}

/// Complete view state the engine derives from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchiveView {
    pub collection: Collection,
    pub filters: FilterSet,
    pub sort: SortKey,
}

/// Derive the ordered visible subset of `archives` for `view` at `now`.
///
/// Collection predicate first, then each active filter as a logical AND,
/// then the sort. Returns a fresh Vec; the input is never mutated.
pub fn apply(archives: &[Archive], view: &ArchiveView, now: DateTime<Utc>) -> Vec<Archive> {
    // Duplicates membership depends on the whole input, so count names
    // up front. Only computed when that collection is active.
    let name_counts: Option<HashMap<String, usize>> =
        if view.collection == Collection::Duplicates {
            let mut counts = HashMap::new();
            for archive in archives {
                *counts.entry(archive.name.to_lowercase()).or_insert(0) += 1;
            }
            Some(counts)
        } else {
            None
        };

    let mut result: Vec<Archive> = archives
        .iter()
        .filter(|a| in_collection(a, view.collection, now, name_counts.as_ref()))
        .filter(|a| matches_filters(a, &view.filters, view.collection))
        .cloned()
        .collect();

    sort_archives(&mut result, view.sort);
    result
}

fn in_collection(
    archive: &Archive,
    collection: Collection,
    now: DateTime<Utc>,
    name_counts: Option<&HashMap<String, usize>>,
) -> bool {
    match collection {
        Collection::All => true,
        Collection::Recent => now.signed_duration_since(archive.created_at) < Duration::hours(24),
        Collection::Week => now.signed_duration_since(archive.created_at) < Duration::days(7),
        Collection::Month => {
            archive.created_at.year() == now.year() && archive.created_at.month() == now.month()
        }
        Collection::Favorites => archive.favorite,
        Collection::Failed => archive.status.is_failure(),
        Collection::Duplicates => name_counts
            .and_then(|counts| counts.get(&archive.name.to_lowercase()))
            .is_some_and(|&count| count > 1),
    }
}

fn matches_filters(archive: &Archive, filters: &FilterSet, collection: Collection) -> bool {
    if let Some(search) = &filters.search {
        if !search.is_empty()
            && !archive.name.to_lowercase().contains(&search.to_lowercase())
        {
            return false;
        }
    }

    if let Some(printer_id) = filters.printer_id {
        if archive.printer_id != Some(printer_id) {
            return false;
        }
    }

    if let Some(material) = &filters.material {
        if !csv_contains(archive.material.as_deref(), material) {
            return false;
        }
    }

    if !filters.colors.is_empty() {
        let archive_colors = split_csv(archive.colors.as_deref());
        let matched = match filters.color_match {
            ColorMatch::Any => filters
                .colors
                .iter()
                .any(|c| contains_ignore_case(&archive_colors, c)),
            ColorMatch::All => filters
                .colors
                .iter()
                .all(|c| contains_ignore_case(&archive_colors, c)),
        };
        if !matched {
            return false;
        }
    }

    // Viewing the favorites collection already constrains to favorites,
    // so the standalone toggle is ignored there. Same rule for the failed
    // collection and the hide-failed toggle.
    if filters.favorites_only && collection != Collection::Favorites && !archive.favorite {
        return false;
    }

    if filters.hide_failed
        && collection != Collection::Failed
        && archive.status.is_failure()
    {
        return false;
    }

    if let Some(tag) = &filters.tag {
        if !csv_contains(archive.tags.as_deref(), tag) {
            return false;
        }
    }

    if let Some(kind) = filters.file_kind {
        if classify_file(archive.filename.as_deref()) != kind {
            return false;
        }
    }

    true
}

fn sort_archives(archives: &mut [Archive], sort: SortKey) {
    // Stable sort; equal keys keep their incoming order.
    match sort {
        SortKey::DateDesc => archives.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::DateAsc => archives.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::NameAsc => archives.sort_by(|a, b| name_key(&a.name).cmp(&name_key(&b.name))),
        SortKey::NameDesc => archives.sort_by(|a, b| name_key(&b.name).cmp(&name_key(&a.name))),
        SortKey::SizeAsc => archives.sort_by(|a, b| a.file_size.cmp(&b.file_size)),
        SortKey::SizeDesc => archives.sort_by(|a, b| b.file_size.cmp(&a.file_size)),
    }
}

/// Case-folded key for name ordering so `Benchy` and `benchy` collate
/// together regardless of byte order.
fn name_key(name: &str) -> (String, &str) {
    (name.to_lowercase(), name)
}

/// Split a comma-separated field into trimmed, non-empty parts.
///
/// Stored fields are split at filter time on every pass, matching the
/// backend's representation.
fn split_csv(field: Option<&str>) -> Vec<String> {
    field
        .map(|raw| {
            raw.split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn csv_contains(field: Option<&str>, wanted: &str) -> bool {
    split_csv(field)
        .iter()
        .any(|part| part.eq_ignore_ascii_case(wanted.trim()))
}

fn contains_ignore_case(haystack: &[String], needle: &str) -> bool {
    haystack
        .iter()
        .any(|item| item.eq_ignore_ascii_case(needle.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::test_helpers::{archive, archive_at};
    use chrono::TimeZone;
    use printbay_protocol::PrintStatus;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap()
    }

    fn view(collection: Collection, filters: FilterSet, sort: SortKey) -> ArchiveView {
        ArchiveView {
            collection,
            filters,
            sort,
        }
    }

    #[test]
    fn test_output_is_subset_and_idempotent() {
        let archives = vec![
            archive(1, "benchy", PrintStatus::Completed),
            archive(2, "calicat", PrintStatus::Failed),
            archive(3, "benchy", PrintStatus::Completed),
        ];
        let v = view(
            Collection::All,
            FilterSet {
                hide_failed: true,
                ..FilterSet::default()
            },
            SortKey::NameAsc,
        );

        let once = apply(&archives, &v, now());
        assert!(once.iter().all(|a| archives.iter().any(|o| o.id == a.id)));

        let twice = apply(&once, &v, now());
        let ids: Vec<i64> = twice.iter().map(|a| a.id).collect();
        assert_eq!(ids, once.iter().map(|a| a.id).collect::<Vec<_>>());
    }

    #[test]
    fn test_collection_time_windows() {
        let archives = vec![
            archive_at(1, "a", now() - Duration::hours(2)),
            archive_at(2, "b", now() - Duration::days(3)),
            archive_at(3, "c", now() - Duration::days(40)),
        ];

        let recent = apply(
            &archives,
            &view(Collection::Recent, FilterSet::default(), SortKey::DateDesc),
            now(),
        );
        assert_eq!(recent.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1]);

        let week = apply(
            &archives,
            &view(Collection::Week, FilterSet::default(), SortKey::DateDesc),
            now(),
        );
        assert_eq!(week.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 2]);

        let month = apply(
            &archives,
            &view(Collection::Month, FilterSet::default(), SortKey::DateAsc),
            now(),
        );
        assert_eq!(month.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn test_duplicates_collection_matches_shared_names() {
        let archives = vec![
            archive(1, "benchy", PrintStatus::Completed),
            archive(2, "Benchy", PrintStatus::Completed),
            archive(3, "calicat", PrintStatus::Completed),
        ];
        let result = apply(
            &archives,
            &view(
                Collection::Duplicates,
                FilterSet::default(),
                SortKey::DateAsc,
            ),
            now(),
        );
        let ids: Vec<i64> = result.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_failed_collection_overrides_hide_failed() {
        let archives = vec![
            archive(1, "ok", PrintStatus::Completed),
            archive(2, "bad", PrintStatus::Failed),
            archive(3, "stopped", PrintStatus::Aborted),
        ];
        let v = view(
            Collection::Failed,
            FilterSet {
                hide_failed: true,
                ..FilterSet::default()
            },
            SortKey::DateAsc,
        );

        let result = apply(&archives, &v, now());
        let ids: Vec<i64> = result.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_favorites_collection_overrides_favorites_toggle() {
        let mut fav = archive(1, "fav", PrintStatus::Completed);
        fav.favorite = true;
        let archives = vec![fav, archive(2, "plain", PrintStatus::Completed)];

        let v = view(
            Collection::Favorites,
            FilterSet {
                favorites_only: true,
                ..FilterSet::default()
            },
            SortKey::DateAsc,
        );
        let result = apply(&archives, &v, now());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);
    }

    #[test]
    fn test_empty_color_selection_is_noop() {
        let mut a = archive(1, "red", PrintStatus::Completed);
        a.colors = Some("Red".to_string());
        let mut b = archive(2, "blue", PrintStatus::Completed);
        b.colors = Some("Blue".to_string());
        let archives = vec![a, b];

        let no_filter = apply(
            &archives,
            &view(Collection::All, FilterSet::default(), SortKey::DateAsc),
            now(),
        );
        let empty_colors = apply(
            &archives,
            &view(
                Collection::All,
                FilterSet {
                    colors: vec![],
                    color_match: ColorMatch::All,
                    ..FilterSet::default()
                },
                SortKey::DateAsc,
            ),
            now(),
        );
        assert_eq!(
            no_filter.iter().map(|x| x.id).collect::<Vec<_>>(),
            empty_colors.iter().map(|x| x.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_all_mode_is_subset_of_any_mode() {
        let mut a = archive(1, "one", PrintStatus::Completed);
        a.colors = Some("Red, Blue".to_string());
        let mut b = archive(2, "two", PrintStatus::Completed);
        b.colors = Some("Red".to_string());
        let mut c = archive(3, "three", PrintStatus::Completed);
        c.colors = Some("Green".to_string());
        let archives = vec![a, b, c];

        let wanted = vec!["red".to_string(), "blue".to_string()];

        let any = apply(
            &archives,
            &view(
                Collection::All,
                FilterSet {
                    colors: wanted.clone(),
                    color_match: ColorMatch::Any,
                    ..FilterSet::default()
                },
                SortKey::DateAsc,
            ),
            now(),
        );
        let all = apply(
            &archives,
            &view(
                Collection::All,
                FilterSet {
                    colors: wanted,
                    color_match: ColorMatch::All,
                    ..FilterSet::default()
                },
                SortKey::DateAsc,
            ),
            now(),
        );

        assert!(all.iter().all(|x| any.iter().any(|y| y.id == x.id)));
        assert_eq!(all.iter().map(|x| x.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(any.iter().map(|x| x.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_file_kind_classification() {
        assert_eq!(classify_file(Some("print.gcode")), FileKind::Gcode);
        assert_eq!(classify_file(Some("model.gcode.3mf")), FileKind::Gcode);
        assert_eq!(classify_file(Some("model.3mf")), FileKind::Source);
        assert_eq!(classify_file(None), FileKind::Source);
        assert_eq!(classify_file(Some("PART.GCODE")), FileKind::Gcode);
    }

    #[test]
    fn test_material_filter_scenario() {
        let mut pla = archive(1, "benchy", PrintStatus::Completed);
        pla.material = Some("PLA".to_string());
        let mut petg = archive(2, "vase", PrintStatus::Failed);
        petg.material = Some("PETG".to_string());
        petg.created_at = now() - Duration::days(2);
        let archives = vec![pla, petg];

        let result = apply(
            &archives,
            &view(
                Collection::All,
                FilterSet {
                    material: Some("PLA".to_string()),
                    ..FilterSet::default()
                },
                SortKey::DateDesc,
            ),
            now(),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let archives = vec![
            archive(1, "Flexi Rex", PrintStatus::Completed),
            archive(2, "Benchy", PrintStatus::Completed),
        ];
        let result = apply(
            &archives,
            &view(
                Collection::All,
                FilterSet {
                    search: Some("rex".to_string()),
                    ..FilterSet::default()
                },
                SortKey::DateAsc,
            ),
            now(),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);
    }

    #[test]
    fn test_tag_filter_splits_and_trims() {
        let mut a = archive(1, "tagged", PrintStatus::Completed);
        a.tags = Some("toys , gifts,calibration".to_string());
        let archives = vec![a, archive(2, "untagged", PrintStatus::Completed)];

        let result = apply(
            &archives,
            &view(
                Collection::All,
                FilterSet {
                    tag: Some("gifts".to_string()),
                    ..FilterSet::default()
                },
                SortKey::DateAsc,
            ),
            now(),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);
    }

    #[test]
    fn test_sort_orders_are_deterministic() {
        let mut a = archive_at(1, "bravo", now() - Duration::hours(3));
        a.file_size = 200;
        let mut b = archive_at(2, "Alpha", now() - Duration::hours(1));
        b.file_size = 100;
        let mut c = archive_at(3, "charlie", now() - Duration::hours(2));
        c.file_size = 300;
        let archives = vec![a, b, c];

        let by = |sort: SortKey| -> Vec<i64> {
            apply(
                &archives,
                &view(Collection::All, FilterSet::default(), sort),
                now(),
            )
            .iter()
            .map(|x| x.id)
            .collect()
        };

        assert_eq!(by(SortKey::DateDesc), vec![2, 3, 1]);
        assert_eq!(by(SortKey::DateAsc), vec![1, 3, 2]);
        assert_eq!(by(SortKey::NameAsc), vec![2, 1, 3]);
        assert_eq!(by(SortKey::NameDesc), vec![3, 1, 2]);
        assert_eq!(by(SortKey::SizeAsc), vec![2, 1, 3]);
        assert_eq!(by(SortKey::SizeDesc), vec![3, 1, 2]);

        // Sorting twice with the same key yields the same order.
        assert_eq!(by(SortKey::NameAsc), by(SortKey::NameAsc));
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let result = apply(
            &[],
            &view(Collection::Recent, FilterSet::default(), SortKey::DateDesc),
            now(),
        );
        assert!(result.is_empty());
    }
}
