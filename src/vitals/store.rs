use serde::Serialize;

use super::diagnostics::{Diagnostics, LayoutShiftRecord, LongTaskRecord, ResourceTiming};
use super::errors::{ErrorRecord, ErrorSink};
use super::recorder::MetricRecorder;
use super::types::{MetricKind, MetricRecord, Rating};

/// Shared state of one page context. Every collector writes to its own part.
#[derive(Debug, Clone, Default)]
pub struct VitalsStore {
    pub(crate) metrics: MetricRecorder,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) errors: ErrorSink,
    collected: bool,
}

impl VitalsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn metrics(&self) -> &MetricRecorder {
        &self.metrics
    }

    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    #[must_use]
    pub const fn errors(&self) -> &ErrorSink {
        &self.errors
    }

    #[must_use]
    pub const fn is_collected(&self) -> bool {
        self.collected
    }

    /// Flags the collection as stable. Returns `true` only on the first call.
    pub fn mark_collected(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }

    #[must_use]
    pub fn snapshot(&self) -> VitalsSnapshot {
        let metric = |kind| self.metrics.get(kind).cloned();
        VitalsSnapshot {
            lcp: metric(MetricKind::Lcp),
            cls: metric(MetricKind::Cls),
            inp: metric(MetricKind::Inp),
            fcp: metric(MetricKind::Fcp),
            ttfb: metric(MetricKind::Ttfb),
            fid: metric(MetricKind::Fid),
            layout_shifts: self.diagnostics.layout_shifts().to_vec(),
            long_tasks: self.diagnostics.long_tasks().to_vec(),
            resource_timings: self.diagnostics.resource_timings().to_vec(),
            errors: self.errors.records().to_vec(),
            collected: self.collected,
        }
    }

    #[must_use]
    pub fn summary(&self) -> VitalsSummary {
        let rating = |kind| self.metrics.get(kind).map(|record| record.rating);
        VitalsSummary {
            lcp: self.metrics.value(MetricKind::Lcp),
            cls: self.metrics.value(MetricKind::Cls),
            inp: self.metrics.value(MetricKind::Inp),
            fcp: self.metrics.value(MetricKind::Fcp),
            ttfb: self.metrics.value(MetricKind::Ttfb),
            ratings: SummaryRatings {
                lcp: rating(MetricKind::Lcp),
                cls: rating(MetricKind::Cls),
                inp: rating(MetricKind::Inp),
            },
            layout_shift_count: self.diagnostics.layout_shifts().len(),
            long_task_count: self.diagnostics.long_tasks().len(),
            slow_resources: self.diagnostics.resource_timings().len(),
        }
    }
}

/// Read-only copy of the whole store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsSnapshot {
    #[serde(rename = "LCP")]
    pub lcp: Option<MetricRecord>,
    #[serde(rename = "CLS")]
    pub cls: Option<MetricRecord>,
    #[serde(rename = "INP")]
    pub inp: Option<MetricRecord>,
    #[serde(rename = "FCP")]
    pub fcp: Option<MetricRecord>,
    #[serde(rename = "TTFB")]
    pub ttfb: Option<MetricRecord>,
    #[serde(rename = "FID")]
    pub fid: Option<MetricRecord>,
    pub layout_shifts: Vec<LayoutShiftRecord>,
    pub long_tasks: Vec<LongTaskRecord>,
    pub resource_timings: Vec<ResourceTiming>,
    pub errors: Vec<ErrorRecord>,
    pub collected: bool,
}

impl VitalsSnapshot {
    #[must_use]
    pub const fn metric(&self, kind: MetricKind) -> Option<&MetricRecord> {
        match kind {
            MetricKind::Lcp => self.lcp.as_ref(),
            MetricKind::Cls => self.cls.as_ref(),
            MetricKind::Inp => self.inp.as_ref(),
            MetricKind::Fcp => self.fcp.as_ref(),
            MetricKind::Ttfb => self.ttfb.as_ref(),
            MetricKind::Fid => self.fid.as_ref(),
        }
    }

    pub fn metrics(&self) -> impl Iterator<Item = &MetricRecord> {
        MetricKind::ALL
            .into_iter()
            .filter_map(|kind| self.metric(kind))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryRatings {
    #[serde(rename = "LCP")]
    pub lcp: Option<Rating>,
    #[serde(rename = "CLS")]
    pub cls: Option<Rating>,
    #[serde(rename = "INP")]
    pub inp: Option<Rating>,
}

/// Flattened view of the headline values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsSummary {
    #[serde(rename = "LCP")]
    pub lcp: Option<f64>,
    #[serde(rename = "CLS")]
    pub cls: Option<f64>,
    #[serde(rename = "INP")]
    pub inp: Option<f64>,
    #[serde(rename = "FCP")]
    pub fcp: Option<f64>,
    #[serde(rename = "TTFB")]
    pub ttfb: Option<f64>,
    pub ratings: SummaryRatings,
    pub layout_shift_count: usize,
    pub long_task_count: usize,
    pub slow_resources: usize,
}

/// Final output of a collection run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VitalsReport {
    pub summary: VitalsSummary,
    pub snapshot: VitalsSnapshot,
}

impl From<&VitalsStore> for VitalsReport {
    fn from(store: &VitalsStore) -> Self {
        Self {
            summary: store.summary(),
            snapshot: store.snapshot(),
        }
    }
}
