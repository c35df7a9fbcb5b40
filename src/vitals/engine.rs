use std::collections::BTreeSet;

use super::cls::ClsAggregator;
use super::errors::ErrorScope;
use super::inp::InpAggregator;
use super::single_shot::{FidCollector, handle_lcp_batch, handle_paint_batch, read_ttfb};
use super::store::{VitalsReport, VitalsSnapshot, VitalsStore, VitalsSummary};
use super::types::{MetricKind, NavigationEntry, ResourceEntry};
use crate::error::{ObserveError, SourceTable};
use crate::observe::{EntryBatch, EntryCategory};

/// Owns the store and every aggregator. Each category writes only the metric
/// it derives, so batches from different categories may interleave freely.
#[derive(Debug, Clone, Default)]
pub struct VitalsEngine {
    store: VitalsStore,
    cls: ClsAggregator,
    inp: InpAggregator,
    fid: FidCollector,
    active: BTreeSet<EntryCategory>,
}

impl VitalsEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a category as subscribed. Batches for other categories are dropped.
    pub fn activate(&mut self, category: EntryCategory) {
        self.active.insert(category);
    }

    #[must_use]
    pub fn is_active(&self, category: EntryCategory) -> bool {
        self.active.contains(&category)
    }

    /// Records an install failure against the metric it would have fed.
    /// Long tasks are an optional capability and fail silently.
    pub fn record_failure(&mut self, error: &ObserveError) {
        let scope = match error {
            ObserveError::Unsupported { category } | ObserveError::Setup { category, .. } => {
                match category.metric() {
                    Some(kind) => ErrorScope::Metric(kind),
                    None => {
                        tracing::debug!("{} not available: {}", category, error);
                        return;
                    }
                }
            }
            ObserveError::TableUnavailable { table, .. } => match table {
                SourceTable::Navigation => ErrorScope::Metric(MetricKind::Ttfb),
                SourceTable::Resource => ErrorScope::Resources,
            },
        };
        self.store.errors.push(scope, error);
    }

    pub fn read_navigation(&mut self, entries: &[NavigationEntry]) {
        read_ttfb(entries, &mut self.store.metrics);
    }

    pub fn read_resources(&mut self, entries: &[ResourceEntry]) {
        self.store.diagnostics.set_resource_timings(entries);
        tracing::debug!(
            "{} of {} resources retained as slow",
            self.store.diagnostics.resource_timings().len(),
            entries.len()
        );
    }

    /// Applies one delivered batch. Returns `false` when its category was
    /// never subscribed and the batch was ignored.
    pub fn handle_batch(&mut self, batch: &EntryBatch) -> bool {
        let category = batch.category();
        if !self.is_active(category) {
            tracing::warn!("Ignoring {} batch for inactive subscription", category);
            return false;
        }

        let store = &mut self.store;
        match batch {
            EntryBatch::LargestContentfulPaint(entries) => {
                handle_lcp_batch(entries, &mut store.metrics);
            }
            EntryBatch::LayoutShift(entries) => {
                self.cls
                    .handle_batch(entries, &mut store.metrics, &mut store.diagnostics);
            }
            EntryBatch::Event(entries) => self.inp.handle_batch(entries, &mut store.metrics),
            EntryBatch::FirstInput(entries) => self.fid.handle_batch(entries, &mut store.metrics),
            EntryBatch::Paint(entries) => handle_paint_batch(entries, &mut store.metrics),
            EntryBatch::LongTask(entries) => store.diagnostics.push_long_tasks(entries),
        }
        true
    }

    /// See [`VitalsStore::mark_collected`].
    pub fn mark_collected(&mut self) -> bool {
        self.store.mark_collected()
    }

    #[must_use]
    pub const fn store(&self) -> &VitalsStore {
        &self.store
    }

    #[must_use]
    pub fn snapshot(&self) -> VitalsSnapshot {
        self.store.snapshot()
    }

    #[must_use]
    pub fn summary(&self) -> VitalsSummary {
        self.store.summary()
    }

    #[must_use]
    pub fn report(&self) -> VitalsReport {
        VitalsReport::from(&self.store)
    }
}
