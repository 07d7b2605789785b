//! Result objects assembled after an ingestion pass.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::{IngestStats, TripAnalysis};
use crate::ranking::{SlotCount, ZoneCount};

/// Full analysis result, serialized as JSON by the `export` subcommand.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub stats: IngestStats,
    pub distinct_zones: usize,
    pub distinct_slots: usize,
    pub top_zones: Vec<ZoneCount>,
    pub top_slots: Vec<SlotCount>,
}

impl AnalysisReport {
    pub fn build(source: &str, analysis: &TripAnalysis, n: usize) -> Self {
        AnalysisReport {
            schema_version: 1,
            generated_at: Utc::now(),
            source: source.to_string(),
            stats: analysis.stats().clone(),
            distinct_zones: analysis.tally().distinct_zones(),
            distinct_slots: analysis.tally().distinct_slots(),
            top_zones: analysis.top_zones(n),
            top_slots: analysis.top_busy_slots(n),
        }
    }
}

/// One flat row per run, appended to a long-lived summary CSV.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub total: i64,
    pub valid: i64,
    pub skipped: i64,
    pub distinct_zones: usize,
    pub distinct_slots: usize,
    pub busiest_zone: Option<String>,
    pub busiest_zone_trips: Option<i64>,
}

impl RunSummary {
    pub fn from_analysis(source: &str, analysis: &TripAnalysis) -> Self {
        let leader = analysis.top_zones(1).into_iter().next();
        RunSummary {
            timestamp: Utc::now(),
            source: source.to_string(),
            total: analysis.stats().total,
            valid: analysis.stats().valid,
            skipped: analysis.stats().skipped,
            distinct_zones: analysis.tally().distinct_zones(),
            distinct_slots: analysis.tally().distinct_slots(),
            busiest_zone: leader.as_ref().map(|z| z.zone.clone()),
            busiest_zone_trips: leader.map(|z| z.count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_analysis() -> TripAnalysis {
        let mut analysis = TripAnalysis::new();
        analysis.ingest_line("1,Midtown,2024-01-01 08:30");
        analysis.ingest_line("2,Midtown,2024-01-01 09:30");
        analysis.ingest_line("3,Harlem,2024-01-01 09:45");
        analysis.ingest_line("4,,2024-01-01 09:50");
        analysis
    }

    #[test]
    fn test_build_report() {
        let analysis = sample_analysis();
        let report = AnalysisReport::build("trips.csv", &analysis, 5);

        assert_eq!(report.source, "trips.csv");
        assert_eq!(report.stats.total, 4);
        assert_eq!(report.stats.valid, 3);
        assert_eq!(report.distinct_zones, 2);
        assert_eq!(report.distinct_slots, 3);
        assert_eq!(report.top_zones[0].zone, "Midtown");
        assert_eq!(report.top_slots.len(), 3);
    }

    #[test]
    fn test_run_summary_leader() {
        let analysis = sample_analysis();
        let summary = RunSummary::from_analysis("trips.csv", &analysis);

        assert_eq!(summary.busiest_zone.as_deref(), Some("Midtown"));
        assert_eq!(summary.busiest_zone_trips, Some(2));
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_run_summary_empty_session() {
        let analysis = TripAnalysis::new();
        let summary = RunSummary::from_analysis("empty.csv", &analysis);

        assert_eq!(summary.busiest_zone, None);
        assert_eq!(summary.busiest_zone_trips, None);
        assert_eq!(summary.total, 0);
    }
}
