//! Interaction to Next Paint.
//!
//! Tracks the single longest interaction. The formal definition takes a high
//! percentile (p98) over all interactions; this aggregator reports the maximum
//! instead, which matches it for pages with fewer than 50 interactions and
//! overestimates it beyond that.

use super::recorder::MetricRecorder;
use super::types::{EventTimingEntry, MetricKind};

/// Minimum event duration (ms) requested from the event subscription.
pub const INP_DURATION_THRESHOLD_MS: f64 = 16.0;

#[derive(Debug, Clone, Default)]
pub struct InpAggregator {
    max_duration: f64,
    entry: Option<EventTimingEntry>,
}

impl InpAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, entry: &EventTimingEntry) {
        if entry.duration > self.max_duration {
            self.max_duration = entry.duration;
            self.entry = Some(entry.clone());
        }
    }

    #[must_use]
    pub const fn value(&self) -> f64 {
        self.max_duration
    }

    #[must_use]
    pub fn evidence(&self) -> &[EventTimingEntry] {
        self.entry.as_slice()
    }

    /// Entries arrive pre-filtered by the subscription's duration threshold.
    /// An empty batch leaves INP untouched.
    pub fn handle_batch(&mut self, entries: &[EventTimingEntry], recorder: &mut MetricRecorder) {
        if entries.is_empty() {
            return;
        }
        for entry in entries {
            self.observe(entry);
        }
        recorder.record(MetricKind::Inp, self.value(), self.evidence());
    }
}
