//! View-mode renderers
//!
//! Grid, list and calendar are alternate terminal layouts over the same
//! engine-filtered slice; none of them owns data logic. The log table is
//! rendered from a server page instead of the in-memory archive list.

use chrono::{DateTime, Datelike, Utc};
use clap::ValueEnum;
use console::strip_ansi_codes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use unicode_width::UnicodeWidthStr;

use printbay_protocol::{Archive, PrintLogPage, SmartPlug};

use crate::engine::classify_file;
use crate::ui::{format_bytes, format_duration, UI};

/// Alternate renderings of the same filtered archive data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Grid,
    #[default]
    List,
    Calendar,
}

/// Exactly one detail pane is active per `show` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DetailPane {
    #[default]
    Summary,
    Timelapse,
    Photos,
    Schedule,
}

pub fn render_archives(ui: &UI, archives: &[Archive], mode: ViewMode, now: DateTime<Utc>) {
    if archives.is_empty() {
        ui.info("No archives match the current view");
        return;
    }
    match mode {
        ViewMode::Grid => render_grid(ui, archives),
        ViewMode::List => render_list(ui, archives),
        ViewMode::Calendar => render_calendar(ui, archives, now),
    }
}

/// One aligned row per archive.
fn render_list(ui: &UI, archives: &[Archive]) {
    let name_width = name_column_width(archives);

    println!(
        "{:>6}  {:<name_width$}  {:<10}  {:>9}  {:<16}  {}",
        "ID",
        "NAME",
        "STATUS",
        "SIZE",
        "PRINTER",
        "CREATED",
        name_width = name_width
    );
    ui.separator();

    for archive in archives {
        let marker = if archive.favorite { "*" } else { " " };
        println!(
            "{:>5}{}  {:<name_width$}  {}  {:>9}  {:<16}  {}",
            archive.id,
            marker,
            truncate(&archive.name, name_width),
            pad_ansi(&ui.format_status(archive.status), 10),
            format_bytes(archive.file_size.max(0) as u64),
            truncate(archive.printer_name.as_deref().unwrap_or("-"), 16),
            archive.created_at.format("%Y-%m-%d %H:%M"),
            name_width = name_width
        );
    }
    ui.blank_line();
    ui.info(&format!("{} archive(s)", archives.len()));
}

/// Compact cards flowing across the terminal width.
fn render_grid(ui: &UI, archives: &[Archive]) {
    const CARD_WIDTH: usize = 26;
    let columns = (ui.width() / (CARD_WIDTH + 2)).max(1);

    for row in archives.chunks(columns) {
        let mut lines = vec![String::new(); 4];
        for archive in row {
            let marker = if archive.favorite { "* " } else { "" };
            lines[0].push_str(&pad(
                &format!("#{} {}{}", archive.id, marker, truncate(&archive.name, 18)),
                CARD_WIDTH + 2,
            ));
            lines[1].push_str(&pad(
                &format!(
                    "  {} {}",
                    archive.status.as_str(),
                    format_bytes(archive.file_size.max(0) as u64)
                ),
                CARD_WIDTH + 2,
            ));
            lines[2].push_str(&pad(
                &format!("  {}", archive.material.as_deref().unwrap_or("-")),
                CARD_WIDTH + 2,
            ));
            lines[3].push_str(&pad(
                &format!("  {}", archive.created_at.format("%Y-%m-%d")),
                CARD_WIDTH + 2,
            ));
        }
        for line in lines {
            println!("{}", line.trim_end());
        }
        ui.blank_line();
    }
    ui.info(&format!("{} archive(s)", archives.len()));
}

/// Current-month day buckets; out-of-month archives are summarized.
fn render_calendar(ui: &UI, archives: &[Archive], now: DateTime<Utc>) {
    let mut days: BTreeMap<u32, Vec<&Archive>> = BTreeMap::new();
    let mut out_of_month = 0usize;

    for archive in archives {
        if archive.created_at.year() == now.year() && archive.created_at.month() == now.month() {
            days.entry(archive.created_at.day()).or_default().push(archive);
        } else {
            out_of_month += 1;
        }
    }

    ui.header(&format!("{}", now.format("%B %Y")));
    if days.is_empty() {
        ui.info("No prints this month in the current view");
    }
    for (day, entries) in &days {
        println!("{:>2}.  {} print(s)", day, entries.len());
        for archive in entries {
            println!(
                "       #{} {} [{}]",
                archive.id,
                truncate(&archive.name, 40),
                ui.format_status(archive.status)
            );
        }
    }
    if out_of_month > 0 {
        ui.blank_line();
        ui.info(&format!(
            "{} archive(s) outside {} not shown",
            out_of_month,
            now.format("%B")
        ));
    }
}

/// Detail card for one archive; the pane selects which facet is shown.
pub fn render_detail(ui: &UI, archive: &Archive, pane: DetailPane) {
    match pane {
        DetailPane::Summary => {
            let mut rows = vec![
                ("Name", archive.name.clone()),
                ("Status", ui.format_status(archive.status)),
                (
                    "File",
                    archive.filename.clone().unwrap_or_else(|| "-".to_string()),
                ),
                (
                    "Kind",
                    format!("{:?}", classify_file(archive.filename.as_deref())),
                ),
                ("Size", format_bytes(archive.file_size.max(0) as u64)),
                (
                    "Printer",
                    archive
                        .printer_name
                        .clone()
                        .unwrap_or_else(|| "-".to_string()),
                ),
                (
                    "Material",
                    archive.material.clone().unwrap_or_else(|| "-".to_string()),
                ),
                (
                    "Colors",
                    archive.colors.clone().unwrap_or_else(|| "-".to_string()),
                ),
                ("Tags", archive.tags.clone().unwrap_or_else(|| "-".to_string())),
                ("Favorite", archive.favorite.to_string()),
                ("Created", archive.created_at.format("%Y-%m-%d %H:%M").to_string()),
            ];
            if let Some(secs) = archive.print_time_secs {
                rows.push(("Print time", format_duration(secs)));
            }
            if let Some(grams) = archive.filament_used_g {
                rows.push(("Filament", format!("{:.1} g", grams)));
            }
            if let Some(layers) = archive.layer_count {
                rows.push(("Layers", layers.to_string()));
            }
            ui.card(&format!("Archive #{}", archive.id), rows);
        }
        DetailPane::Timelapse => {
            if archive.has_timelapse {
                ui.card(
                    &format!("Archive #{} — timelapse", archive.id),
                    vec![(
                        "Download",
                        format!("archives/{}/timelapse", archive.id),
                    )],
                );
            } else {
                ui.info("No timelapse recorded for this archive");
            }
        }
        DetailPane::Photos => {
            if archive.photo_count > 0 {
                ui.card(
                    &format!("Archive #{} — photos", archive.id),
                    vec![
                        ("Count", archive.photo_count.to_string()),
                        ("Download", format!("archives/{}/photos", archive.id)),
                    ],
                );
            } else {
                ui.info("No photos attached to this archive");
            }
        }
        DetailPane::Schedule => {
            ui.card(
                &format!("Archive #{} — reprint", archive.id),
                vec![
                    (
                        "Sliced file",
                        match classify_file(archive.filename.as_deref()) {
                            crate::engine::FileKind::Gcode => "ready".to_string(),
                            crate::engine::FileKind::Source => "needs slicing".to_string(),
                        },
                    ),
                    (
                        "Printer",
                        archive
                            .printer_name
                            .clone()
                            .unwrap_or_else(|| "unassigned".to_string()),
                    ),
                ],
            );
        }
    }
}

/// Render one server page of the print log with a pagination footer.
pub fn render_log_page(ui: &UI, page: &PrintLogPage) {
    if page.entries.is_empty() {
        ui.info("No log entries for this query");
        return;
    }

    println!(
        "{:>6}  {:<28}  {:<16}  {:<10}  {:<10}  {}",
        "ID", "JOB", "PRINTER", "USER", "STATUS", "STARTED"
    );
    ui.separator();
    for entry in &page.entries {
        println!(
            "{:>6}  {:<28}  {:<16}  {:<10}  {}  {}  ({})",
            entry.id,
            truncate(&entry.job_name, 28),
            truncate(&entry.printer_name, 16),
            truncate(entry.username.as_deref().unwrap_or("-"), 10),
            pad_ansi(&ui.format_status(entry.status), 10),
            entry.started_at.format("%Y-%m-%d %H:%M"),
            entry
                .duration_secs
                .map(format_duration)
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    ui.blank_line();
    let shown_from = page.offset as u64 + 1;
    let shown_to = page.offset as u64 + page.entries.len() as u64;
    ui.info(&format!(
        "Showing {}-{} of {} entries",
        shown_from, shown_to, page.total
    ));
    if shown_to < page.total {
        ui.info(&format!(
            "Next page: --offset {}",
            page.offset + page.limit
        ));
    }
}

pub fn render_plugs(ui: &UI, plugs: &[SmartPlug]) {
    if plugs.is_empty() {
        ui.info("No smart plugs configured");
        return;
    }
    println!("{:>4}  {:<20}  {:<6}  {}", "ID", "NAME", "STATE", "POWER");
    ui.separator();
    for plug in plugs {
        println!(
            "{:>4}  {:<20}  {}  {}",
            plug.id,
            truncate(&plug.name, 20),
            pad_ansi(&ui.format_plug_state(plug.on), 6),
            plug.power_w
                .map(|w| format!("{:.1} W", w))
                .unwrap_or_else(|| "-".to_string()),
        );
    }
}

/// Widest display name in chars, clamped to a sane column range.
fn name_column_width(archives: &[Archive]) -> usize {
    archives
        .iter()
        .map(|a| a.name.chars().count())
        .max()
        .unwrap_or(4)
        .clamp(4, 40)
}

/// Pad a possibly-colored cell to `width` by its visible width, so ANSI
/// escape codes don't count against the column.
fn pad_ansi(styled: &str, width: usize) -> String {
    let visible = strip_ansi_codes(styled).width();
    let mut out = styled.to_string();
    for _ in visible..width {
        out.push(' ');
    }
    out
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn pad(text: &str, width: usize) -> String {
    let mut out = truncate(text, width.saturating_sub(1));
    while out.chars().count() < width {
        out.push(' ');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::test_helpers::archive;
    use printbay_protocol::PrintStatus;

    #[test]
    fn test_pad_ansi_ignores_escape_codes() {
        let colored = "\u{1b}[32mcompleted\u{1b}[0m";
        let padded = pad_ansi(colored, 10);
        assert_eq!(strip_ansi_codes(&padded).width(), 10);
        assert!(padded.starts_with(colored));

        // Plain cells pad the same way.
        assert_eq!(pad_ansi("on", 6), "on    ");
        // Already-full cells are left alone.
        assert_eq!(pad_ansi("completed!", 10), "completed!");
    }

    #[test]
    fn test_name_column_width_counts_chars_not_bytes() {
        let archives = vec![
            archive(1, "bénchy", PrintStatus::Completed),
            archive(2, "a", PrintStatus::Completed),
        ];
        // "bénchy" is 7 bytes but 6 chars wide.
        assert_eq!(name_column_width(&archives), 6);

        assert_eq!(name_column_width(&[]), 4);
        let long = archive(3, &"x".repeat(120), PrintStatus::Completed);
        assert_eq!(name_column_width(&[long]), 40);
    }

    #[test]
    fn test_truncate_keeps_short_strings() {
        assert_eq!(truncate("benchy", 10), "benchy");
        assert_eq!(truncate("a-very-long-archive-name", 10), "a-very-lo…");
    }

    #[test]
    fn test_pad_fills_to_width() {
        assert_eq!(pad("ab", 5), "ab   ");
        assert_eq!(pad("ab", 5).chars().count(), 5);
    }
}
