use serde::Serialize;
use std::collections::HashMap;

/// One hour-long activity window within a pickup zone.
///
/// The derived `Ord` compares zone first, then hour, which is exactly the
/// tie-break order the ranked views need.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Slot {
    pub zone: String,
    pub hour: u8,
}

/// Running trip counts per zone and per zone-hour slot.
///
/// Invariant: a zone's total always equals the sum of its slot counts, since
/// [`TripTally::record`] bumps both together.
#[derive(Debug, Default)]
pub struct TripTally {
    zone_counts: HashMap<String, i64>,
    slot_counts: HashMap<Slot, i64>,
}

impl TripTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one valid trip against both aggregates.
    pub fn record(&mut self, zone: &str, hour: u8) {
        *self.zone_counts.entry(zone.to_string()).or_insert(0) += 1;
        *self
            .slot_counts
            .entry(Slot {
                zone: zone.to_string(),
                hour,
            })
            .or_insert(0) += 1;
    }

    /// Empties both aggregates for an independent analysis.
    pub fn reset(&mut self) {
        self.zone_counts.clear();
        self.slot_counts.clear();
    }

    pub fn zone_counts(&self) -> &HashMap<String, i64> {
        &self.zone_counts
    }

    pub fn slot_counts(&self) -> &HashMap<Slot, i64> {
        &self.slot_counts
    }

    pub fn distinct_zones(&self) -> usize {
        self.zone_counts.len()
    }

    pub fn distinct_slots(&self) -> usize {
        self.slot_counts.len()
    }
}
