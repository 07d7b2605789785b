//! Ingestion driver and the analysis session facade.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use crate::parser::{self, Reject, Strictness};
use crate::ranking::{self, SlotCount, ZoneCount};
use crate::tally::TripTally;

/// Line counters for one ingestion pass.
///
/// `valid` always equals `total - skipped`; the per-reason fields break the
/// skips down further.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub total: i64,
    pub valid: i64,
    pub skipped: i64,

    // skip reasons
    pub empty_lines: i64,
    pub too_few_fields: i64,
    pub empty_zone: i64,
    pub malformed_timestamp: i64,
    pub hour_out_of_range: i64,
    pub minute_out_of_range: i64,
    pub invalid_distance: i64,
    pub invalid_fare: i64,
}

impl IngestStats {
    fn count_reject(&mut self, reason: Reject) {
        match reason {
            Reject::TooFewFields => self.too_few_fields += 1,
            Reject::EmptyZone => self.empty_zone += 1,
            Reject::MalformedTimestamp => self.malformed_timestamp += 1,
            Reject::HourOutOfRange => self.hour_out_of_range += 1,
            Reject::MinuteOutOfRange => self.minute_out_of_range += 1,
            Reject::InvalidDistance => self.invalid_distance += 1,
            Reject::InvalidFare => self.invalid_fare += 1,
        }
    }
}

/// One aggregation session over trip record lines.
///
/// Owns the count aggregates and the line counters, and exposes the four
/// core operations: ingest, `top_zones`, `top_busy_slots`, and `reset`.
/// Processing is single-threaded; lines are applied in input order.
#[derive(Debug, Default)]
pub struct TripAnalysis {
    strictness: Strictness,
    tally: TripTally,
    stats: IngestStats,
}

impl TripAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strictness(strictness: Strictness) -> Self {
        TripAnalysis {
            strictness,
            ..Self::default()
        }
    }

    /// Feeds one record line (header already removed) into the aggregates.
    ///
    /// Empty lines count as skipped without invoking the parser; rejected
    /// lines are counted per reason. Nothing here is ever fatal.
    pub fn ingest_line(&mut self, line: &str) {
        self.stats.total += 1;

        if line.is_empty() {
            self.stats.skipped += 1;
            self.stats.empty_lines += 1;
            return;
        }

        match parser::parse_line(line, self.strictness) {
            Ok((zone, hour)) => {
                self.stats.valid += 1;
                self.tally.record(&zone, hour);
            }
            Err(reason) => {
                self.stats.skipped += 1;
                self.stats.count_reject(reason);
            }
        }
    }

    /// Reads lines from `reader`, discarding the first as the header.
    ///
    /// The header is not validated. Input with no lines at all is a valid
    /// run that leaves every counter at zero.
    ///
    /// # Errors
    ///
    /// Only I/O errors abort the pass; malformed lines never do.
    pub fn ingest_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut lines = reader.lines();
        if lines.next().transpose()?.is_none() {
            return Ok(());
        }

        for line in lines {
            self.ingest_line(&line?);
            if self.stats.total % 100_000 == 0 {
                debug!(lines = self.stats.total, "ingestion progress");
            }
        }
        Ok(())
    }

    /// Ingests a trip CSV from disk, gunzipping `.gz` paths transparently.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened or a read fails mid-pass.
    pub fn ingest_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("cannot open trip file '{}'", path.display()))?;

        if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            self.ingest_reader(BufReader::new(GzDecoder::new(file)))?;
        } else {
            self.ingest_reader(BufReader::new(file))?;
        }

        info!(
            source = %path.display(),
            total = self.stats.total,
            valid = self.stats.valid,
            skipped = self.stats.skipped,
            zones = self.tally.distinct_zones(),
            slots = self.tally.distinct_slots(),
            "ingestion complete"
        );
        Ok(())
    }

    /// The `n` busiest pickup zones, in the selector's total order.
    pub fn top_zones(&self, n: usize) -> Vec<ZoneCount> {
        ranking::top_n(self.tally.zone_counts(), n)
            .into_iter()
            .map(|(zone, count)| ZoneCount { zone, count })
            .collect()
    }

    /// The `n` busiest zone-hour slots, in the selector's total order.
    pub fn top_busy_slots(&self, n: usize) -> Vec<SlotCount> {
        ranking::top_n(self.tally.slot_counts(), n)
            .into_iter()
            .map(|(slot, count)| SlotCount {
                zone: slot.zone,
                hour: slot.hour,
                count,
            })
            .collect()
    }

    /// Clears the aggregates and all counters for an independent run.
    pub fn reset(&mut self) {
        self.tally.reset();
        self.stats = IngestStats::default();
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    pub fn tally(&self) -> &TripTally {
        &self.tally
    }
}
