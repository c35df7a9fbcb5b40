//! Inbound boundary: typed entry streams and the collector task that drains them.
mod collector;

#[cfg(test)]
mod tests;

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::error::ObserveError;
use crate::vitals::inp::INP_DURATION_THRESHOLD_MS;
use crate::vitals::{
    EventTimingEntry, LayoutShiftEntry, LongTaskEntry, MetricKind, NavigationEntry, PaintEntry,
    ResourceEntry,
};

pub use collector::{SETTLE_DELAY, VitalsCollector, setup_vitals_collector};

/// Entry types a source can be subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntryCategory {
    #[serde(rename = "largest-contentful-paint")]
    LargestContentfulPaint,
    #[serde(rename = "layout-shift")]
    LayoutShift,
    #[serde(rename = "event")]
    Event,
    #[serde(rename = "first-input")]
    FirstInput,
    #[serde(rename = "paint")]
    Paint,
    #[serde(rename = "longtask")]
    LongTask,
}

impl EntryCategory {
    pub const ALL: [EntryCategory; 6] = [
        EntryCategory::LargestContentfulPaint,
        EntryCategory::LayoutShift,
        EntryCategory::Event,
        EntryCategory::FirstInput,
        EntryCategory::Paint,
        EntryCategory::LongTask,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EntryCategory::LargestContentfulPaint => "largest-contentful-paint",
            EntryCategory::LayoutShift => "layout-shift",
            EntryCategory::Event => "event",
            EntryCategory::FirstInput => "first-input",
            EntryCategory::Paint => "paint",
            EntryCategory::LongTask => "longtask",
        }
    }

    /// Parses a browser entry type name. Types the engine does not observe
    /// (`mark`, `measure`, ...) yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        EntryCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == name)
    }

    /// Metric fed by this category. Long tasks only feed diagnostics.
    #[must_use]
    pub const fn metric(self) -> Option<MetricKind> {
        match self {
            EntryCategory::LargestContentfulPaint => Some(MetricKind::Lcp),
            EntryCategory::LayoutShift => Some(MetricKind::Cls),
            EntryCategory::Event => Some(MetricKind::Inp),
            EntryCategory::FirstInput => Some(MetricKind::Fid),
            EntryCategory::Paint => Some(MetricKind::Fcp),
            EntryCategory::LongTask => None,
        }
    }

    /// Options the collector subscribes with.
    #[must_use]
    pub const fn options(self) -> ObserveOptions {
        match self {
            EntryCategory::Event => ObserveOptions {
                buffered: true,
                duration_threshold: Some(INP_DURATION_THRESHOLD_MS),
            },
            EntryCategory::LargestContentfulPaint
            | EntryCategory::LayoutShift
            | EntryCategory::FirstInput
            | EntryCategory::Paint
            | EntryCategory::LongTask => ObserveOptions {
                buffered: true,
                duration_threshold: None,
            },
        }
    }
}

impl fmt::Display for EntryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Deliver entries recorded before the subscription was made.
    pub buffered: bool,
    /// Drop entries shorter than this many milliseconds.
    pub duration_threshold: Option<f64>,
}

impl ObserveOptions {
    #[must_use]
    pub fn admits(&self, duration: f64) -> bool {
        self.duration_threshold
            .is_none_or(|threshold| duration >= threshold)
    }
}

/// One notification from a subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryBatch {
    LargestContentfulPaint(Vec<PaintEntry>),
    LayoutShift(Vec<LayoutShiftEntry>),
    Event(Vec<EventTimingEntry>),
    FirstInput(Vec<EventTimingEntry>),
    Paint(Vec<PaintEntry>),
    LongTask(Vec<LongTaskEntry>),
}

impl EntryBatch {
    #[must_use]
    pub const fn category(&self) -> EntryCategory {
        match self {
            EntryBatch::LargestContentfulPaint(_) => EntryCategory::LargestContentfulPaint,
            EntryBatch::LayoutShift(_) => EntryCategory::LayoutShift,
            EntryBatch::Event(_) => EntryCategory::Event,
            EntryBatch::FirstInput(_) => EntryCategory::FirstInput,
            EntryBatch::Paint(_) => EntryCategory::Paint,
            EntryBatch::LongTask(_) => EntryCategory::LongTask,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            EntryBatch::LargestContentfulPaint(entries) | EntryBatch::Paint(entries) => {
                entries.len()
            }
            EntryBatch::LayoutShift(entries) => entries.len(),
            EntryBatch::Event(entries) | EntryBatch::FirstInput(entries) => entries.len(),
            EntryBatch::LongTask(entries) => entries.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Applies subscription-time filtering. Only event batches carry a
    /// duration threshold.
    #[must_use]
    pub fn filtered(self, options: &ObserveOptions) -> Self {
        match self {
            EntryBatch::Event(entries) => EntryBatch::Event(
                entries
                    .into_iter()
                    .filter(|entry| options.admits(entry.duration))
                    .collect(),
            ),
            other @ (EntryBatch::LargestContentfulPaint(_)
            | EntryBatch::LayoutShift(_)
            | EntryBatch::FirstInput(_)
            | EntryBatch::Paint(_)
            | EntryBatch::LongTask(_)) => other,
        }
    }
}

/// Producer of performance entries for one page context.
///
/// Every method is called at most once, when the collector installs.
pub trait ObservationSource {
    /// Subscribes to one entry type. Batches arrive in non-decreasing
    /// `startTime` order for the lifetime of the returned channel.
    ///
    /// # Errors
    ///
    /// Returns an error when the entry type cannot be observed.
    fn observe(
        &mut self,
        category: EntryCategory,
        options: ObserveOptions,
    ) -> Result<mpsc::Receiver<EntryBatch>, ObserveError>;

    /// One-time read of the navigation timing table.
    ///
    /// # Errors
    ///
    /// Returns an error when the table cannot be read.
    fn navigation_entries(&mut self) -> Result<Vec<NavigationEntry>, ObserveError>;

    /// One-time read of the resource timing table.
    ///
    /// # Errors
    ///
    /// Returns an error when the table cannot be read.
    fn resource_entries(&mut self) -> Result<Vec<ResourceEntry>, ObserveError>;

    /// Fires once when the page's load event has happened. Dropping the sender
    /// without firing means the load will never be observed.
    fn load_signal(&mut self) -> oneshot::Receiver<()>;
}
