use std::cmp::Ordering;

use serde::Serialize;

use super::types::{LayoutShiftEntry, LongTaskEntry, Rect, ResourceEntry};

/// Resources at or below this duration (ms) are not considered slow.
pub const SLOW_RESOURCE_MIN_MS: f64 = 100.0;
/// Number of slow resources retained.
pub const SLOW_RESOURCE_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSourceRecord {
    pub node: Option<String>,
    pub previous_rect: Option<Rect>,
    pub current_rect: Option<Rect>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutShiftRecord {
    pub value: f64,
    pub start_time: f64,
    pub sources: Vec<ShiftSourceRecord>,
}

impl From<&LayoutShiftEntry> for LayoutShiftRecord {
    fn from(entry: &LayoutShiftEntry) -> Self {
        Self {
            value: entry.value,
            start_time: entry.start_time,
            sources: entry
                .sources
                .iter()
                .map(|source| ShiftSourceRecord {
                    node: source.node.clone(),
                    previous_rect: source.previous_rect,
                    current_rect: source.current_rect,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTaskRecord {
    pub start_time: f64,
    pub duration: f64,
    pub attribution: Option<String>,
}

impl From<&LongTaskEntry> for LongTaskRecord {
    fn from(entry: &LongTaskEntry) -> Self {
        Self {
            start_time: entry.start_time,
            duration: entry.duration,
            attribution: entry
                .attribution
                .first()
                .and_then(|attribution| attribution.name.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTiming {
    pub name: String,
    #[serde(rename = "type")]
    pub initiator_type: String,
    pub duration: f64,
    pub transfer_size: Option<u64>,
    pub start_time: f64,
}

impl From<&ResourceEntry> for ResourceTiming {
    fn from(entry: &ResourceEntry) -> Self {
        Self {
            name: entry.name.clone(),
            initiator_type: entry.initiator_type.clone(),
            duration: entry.duration,
            transfer_size: entry.transfer_size,
            start_time: entry.start_time,
        }
    }
}

/// Raw evidence kept for debugging. Shift and task logs are unbounded; the
/// resource list is a one-time ranked snapshot.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    layout_shifts: Vec<LayoutShiftRecord>,
    long_tasks: Vec<LongTaskRecord>,
    resource_timings: Vec<ResourceTiming>,
}

impl Diagnostics {
    pub fn push_layout_shift(&mut self, entry: &LayoutShiftEntry) {
        self.layout_shifts.push(LayoutShiftRecord::from(entry));
    }

    pub fn push_long_tasks(&mut self, entries: &[LongTaskEntry]) {
        self.long_tasks
            .extend(entries.iter().map(LongTaskRecord::from));
    }

    pub fn set_resource_timings(&mut self, resources: &[ResourceEntry]) {
        self.resource_timings = rank_slow_resources(resources);
    }

    #[must_use]
    pub fn layout_shifts(&self) -> &[LayoutShiftRecord] {
        &self.layout_shifts
    }

    #[must_use]
    pub fn long_tasks(&self) -> &[LongTaskRecord] {
        &self.long_tasks
    }

    #[must_use]
    pub fn resource_timings(&self) -> &[ResourceTiming] {
        &self.resource_timings
    }
}

/// Keeps resources slower than [`SLOW_RESOURCE_MIN_MS`], slowest first,
/// truncated to [`SLOW_RESOURCE_LIMIT`].
#[must_use]
pub fn rank_slow_resources(resources: &[ResourceEntry]) -> Vec<ResourceTiming> {
    let mut slow: Vec<ResourceTiming> = resources
        .iter()
        .filter(|resource| resource.duration > SLOW_RESOURCE_MIN_MS)
        .map(ResourceTiming::from)
        .collect();
    slow.sort_by(|a, b| {
        b.duration
            .partial_cmp(&a.duration)
            .unwrap_or(Ordering::Equal)
    });
    slow.truncate(SLOW_RESOURCE_LIMIT);
    slow
}
