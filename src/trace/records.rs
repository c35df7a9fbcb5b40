use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_json::Value;

use crate::observe::{EntryBatch, EntryCategory};
use crate::vitals::{
    EventTimingEntry, LayoutShiftEntry, LongTaskEntry, NavigationEntry, PaintEntry, ResourceEntry,
};

/// Parsed trace, ready to be served by a [`super::TraceSource`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    /// Entry types the recording browser supported. `None` means all.
    pub supported: Option<BTreeSet<EntryCategory>>,
    /// Subscriptions that threw when the recording was made.
    pub failures: BTreeMap<EntryCategory, String>,
    pub navigation_failure: Option<String>,
    pub resource_failure: Option<String>,
    pub navigation: Vec<NavigationEntry>,
    pub resources: Vec<ResourceEntry>,
    pub steps: Vec<TraceStep>,
}

/// Timed event of a replay. `at` is milliseconds since navigation start.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceStep {
    Batch { at: Option<f64>, batch: EntryBatch },
    Load { at: Option<f64> },
}

impl TraceStep {
    #[must_use]
    pub const fn at(&self) -> Option<f64> {
        match self {
            TraceStep::Batch { at, .. } | TraceStep::Load { at } => *at,
        }
    }
}

/// One line of a `.jsonl` session recording.
#[derive(Debug, Deserialize)]
#[serde(tag = "record", rename_all = "kebab-case")]
pub(super) enum SessionRecord {
    Supported {
        #[serde(rename = "entryTypes")]
        entry_types: Vec<String>,
    },
    Batch(BatchRecord),
    Navigation(NavigationEntry),
    Resource(ResourceEntry),
    Load {
        #[serde(default)]
        at: Option<f64>,
    },
    Error {
        #[serde(rename = "entryType")]
        entry_type: String,
        message: String,
    },
}

#[derive(Debug, Deserialize)]
pub(super) struct BatchRecord {
    #[serde(rename = "entryType")]
    pub(super) entry_type: EntryCategory,
    #[serde(default)]
    pub(super) at: Option<f64>,
    #[serde(default)]
    pub(super) entries: Vec<Value>,
}

/// Decodes raw entry objects into the batch type of `category`.
pub(super) fn decode_batch(
    category: EntryCategory,
    entries: Vec<Value>,
) -> Result<EntryBatch, serde_json::Error> {
    let raw = Value::Array(entries);
    let batch = match category {
        EntryCategory::LargestContentfulPaint => {
            EntryBatch::LargestContentfulPaint(serde_json::from_value::<Vec<PaintEntry>>(raw)?)
        }
        EntryCategory::LayoutShift => {
            EntryBatch::LayoutShift(serde_json::from_value::<Vec<LayoutShiftEntry>>(raw)?)
        }
        EntryCategory::Event => {
            EntryBatch::Event(serde_json::from_value::<Vec<EventTimingEntry>>(raw)?)
        }
        EntryCategory::FirstInput => {
            EntryBatch::FirstInput(serde_json::from_value::<Vec<EventTimingEntry>>(raw)?)
        }
        EntryCategory::Paint => EntryBatch::Paint(serde_json::from_value::<Vec<PaintEntry>>(raw)?),
        EntryCategory::LongTask => {
            EntryBatch::LongTask(serde_json::from_value::<Vec<LongTaskEntry>>(raw)?)
        }
    };
    Ok(batch)
}
