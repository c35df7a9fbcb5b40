//! Collectors that derive a metric from one entry rather than an aggregate.

use std::cmp::Ordering;

use super::recorder::MetricRecorder;
use super::types::{EventTimingEntry, MetricKind, NavigationEntry, PaintEntry};

/// Paint entry name that marks First Contentful Paint.
pub const FIRST_CONTENTFUL_PAINT: &str = "first-contentful-paint";

/// Picks the LCP candidate of a batch: the latest-starting entry, ties going to
/// the later position. Under ordered delivery this is the batch's last entry.
#[must_use]
pub fn lcp_candidate(entries: &[PaintEntry]) -> Option<&PaintEntry> {
    entries.iter().max_by(|a, b| {
        a.start_time
            .partial_cmp(&b.start_time)
            .unwrap_or(Ordering::Equal)
    })
}

/// Largest Contentful Paint. Each batch supersedes the previous value.
pub fn handle_lcp_batch(entries: &[PaintEntry], recorder: &mut MetricRecorder) {
    if let Some(candidate) = lcp_candidate(entries) {
        recorder.record(MetricKind::Lcp, candidate.start_time, entries);
    }
}

/// First Contentful Paint.
pub fn handle_paint_batch(entries: &[PaintEntry], recorder: &mut MetricRecorder) {
    for entry in entries
        .iter()
        .filter(|entry| entry.name.as_deref() == Some(FIRST_CONTENTFUL_PAINT))
    {
        recorder.record(
            MetricKind::Fcp,
            entry.start_time,
            std::slice::from_ref(entry),
        );
    }
}

/// Legacy First Input Delay, recorded once from the first delivered input.
#[derive(Debug, Clone, Copy, Default)]
pub struct FidCollector {
    recorded: bool,
}

impl FidCollector {
    #[must_use]
    pub const fn new() -> Self {
        Self { recorded: false }
    }

    pub fn handle_batch(&mut self, entries: &[EventTimingEntry], recorder: &mut MetricRecorder) {
        if self.recorded {
            return;
        }
        let Some(entry) = entries.first() else {
            return;
        };
        let Some(processing_start) = entry.processing_start else {
            tracing::debug!("first-input entry without processingStart; FID not recorded");
            return;
        };
        recorder.record(
            MetricKind::Fid,
            processing_start - entry.start_time,
            std::slice::from_ref(entry),
        );
        self.recorded = true;
    }
}

/// Time to First Byte from the first navigation record. No record, no metric.
pub fn read_ttfb(navigation: &[NavigationEntry], recorder: &mut MetricRecorder) {
    let Some(nav) = navigation.first() else {
        tracing::debug!("No navigation record; TTFB stays absent");
        return;
    };
    recorder.record(MetricKind::Ttfb, nav.response_start, std::slice::from_ref(nav));
}
