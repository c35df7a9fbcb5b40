use std::collections::BTreeMap;

use super::rating::classify;
use super::types::{MetricKind, MetricRecord, ToEvidence};

/// Holds the single live record per metric kind. Writes overwrite in place.
#[derive(Debug, Clone, Default)]
pub struct MetricRecorder {
    records: BTreeMap<MetricKind, MetricRecord>,
}

impl MetricRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record<E>(&mut self, kind: MetricKind, value: f64, entries: &[E])
    where
        E: ToEvidence,
    {
        let rating = classify(kind, value);
        tracing::debug!("{} = {} ({})", kind, value, rating);
        self.records.insert(
            kind,
            MetricRecord {
                kind,
                value,
                rating,
                entries: entries.iter().map(ToEvidence::to_evidence).collect(),
            },
        );
    }

    #[must_use]
    pub fn get(&self, kind: MetricKind) -> Option<&MetricRecord> {
        self.records.get(&kind)
    }

    #[must_use]
    pub fn value(&self, kind: MetricKind) -> Option<f64> {
        self.get(kind).map(|record| record.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricRecord> {
        self.records.values()
    }
}
