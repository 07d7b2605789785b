//! Output formatting and persistence for analysis results.
//!
//! Supports ranked tables with bar charts, JSON printing, and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::ranking::{SlotCount, ZoneCount};
use crate::report::RunSummary;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

const BAR_WIDTH: i64 = 40;

/// Renders the ranked zone table, one bar per row scaled to the leader.
pub fn render_zone_table(zones: &[ZoneCount]) -> String {
    if zones.is_empty() {
        return "No zone data available.\n".to_string();
    }

    let max = zones[0].count.max(1);
    let mut out = format!("{:<6}{:<18}{:<12}\n", "Rank", "Zone", "Trips");
    for (i, z) in zones.iter().enumerate() {
        out.push_str(&format!(
            "{:<6}{:<18}{:<12}{}\n",
            i + 1,
            z.zone,
            z.count,
            bar(z.count, max)
        ));
    }
    out
}

/// Renders the ranked zone-hour table.
pub fn render_slot_table(slots: &[SlotCount]) -> String {
    if slots.is_empty() {
        return "No slot data available.\n".to_string();
    }

    let max = slots[0].count.max(1);
    let mut out = format!("{:<6}{:<18}{:<8}{:<12}\n", "Rank", "Zone", "Hour", "Trips");
    for (i, s) in slots.iter().enumerate() {
        out.push_str(&format!(
            "{:<6}{:<18}{:<8}{:<12}{}\n",
            i + 1,
            s.zone,
            format!("{:02}:00", s.hour),
            s.count,
            bar(s.count, max)
        ));
    }
    out
}

fn bar(count: i64, max: i64) -> String {
    let mut len = (count * BAR_WIDTH) / max;
    if len < 1 && count > 0 {
        len = 1;
    }
    "█".repeat(len as usize)
}

/// Prints a serializable result as pretty JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends a [`RunSummary`] record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summary(path: &str, summary: &RunSummary) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending summary row");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TripAnalysis;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn zone(name: &str, count: i64) -> ZoneCount {
        ZoneCount {
            zone: name.to_string(),
            count,
        }
    }

    fn sample_summary() -> RunSummary {
        let mut analysis = TripAnalysis::new();
        analysis.ingest_line("1,Midtown,2024-01-01 08:30");
        RunSummary::from_analysis("trips.csv", &analysis)
    }

    #[test]
    fn test_render_zone_table_lists_every_row() {
        let table = render_zone_table(&[zone("Midtown", 4), zone("Harlem", 2)]);

        assert!(table.contains("Midtown"));
        assert!(table.contains("Harlem"));
        assert_eq!(table.lines().count(), 3); // header + 2 rows
    }

    #[test]
    fn test_render_zone_table_bar_scales_to_leader() {
        let table = render_zone_table(&[zone("A", 4), zone("B", 1)]);
        let bars: Vec<usize> = table
            .lines()
            .skip(1)
            .map(|l| l.chars().filter(|c| *c == '█').count())
            .collect();

        assert_eq!(bars[0], 40);
        assert_eq!(bars[1], 10);
    }

    #[test]
    fn test_render_empty_tables() {
        assert!(render_zone_table(&[]).contains("No zone data"));
        assert!(render_slot_table(&[]).contains("No slot data"));
    }

    #[test]
    fn test_render_slot_table_formats_hours() {
        let table = render_slot_table(&[SlotCount {
            zone: "Midtown".to_string(),
            hour: 8,
            count: 3,
        }]);

        assert!(table.contains("08:00"));
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_summary()).unwrap();
    }

    #[test]
    fn test_append_summary_creates_file() {
        let path = temp_path("zone_ranker_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_summary(&path, &sample_summary()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_summary_writes_header_once() {
        let path = temp_path("zone_ranker_test_header.csv");
        let _ = fs::remove_file(&path);

        append_summary(&path, &sample_summary()).unwrap();
        append_summary(&path, &sample_summary()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content.lines().filter(|l| l.contains("timestamp")).count();
        assert_eq!(header_count, 1);
        // 1 header + 2 data rows
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }
}
