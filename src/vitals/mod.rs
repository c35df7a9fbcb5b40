//! Web vitals derivation: rating, per-metric aggregation, diagnostics, and the
//! shared store they write to.
pub mod cls;
mod diagnostics;
mod engine;
mod errors;
pub mod inp;
mod rating;
mod recorder;
pub mod single_shot;
mod store;
mod types;


pub use diagnostics::{
    Diagnostics, LayoutShiftRecord, LongTaskRecord, ResourceTiming, SLOW_RESOURCE_LIMIT,
    SLOW_RESOURCE_MIN_MS, ShiftSourceRecord, rank_slow_resources,
};
pub use engine::VitalsEngine;
pub use errors::{ErrorRecord, ErrorScope, ErrorSink};
pub use rating::{ThresholdPair, classify, classify_named, thresholds};
pub use recorder::MetricRecorder;
pub use store::{SummaryRatings, VitalsReport, VitalsSnapshot, VitalsStore, VitalsSummary};
pub use types::{
    EventTimingEntry, EvidenceEntry, LayoutShiftEntry, LongTaskEntry, MetricKind, MetricRecord,
    NavigationEntry, PaintEntry, Rating, Rect, ResourceEntry, ShiftSource, TaskAttribution,
    ToEvidence,
};
