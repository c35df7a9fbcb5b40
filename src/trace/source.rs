use std::collections::BTreeMap;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{ObserveError, SourceTable};
use crate::observe::{EntryBatch, EntryCategory, ObservationSource, ObserveOptions};
use crate::vitals::{NavigationEntry, ResourceEntry};

use super::records::{Trace, TraceStep};

const BATCH_CHANNEL_CAPACITY: usize = 64;

/// How replayed steps are spaced in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pace {
    /// Deliver every step as soon as the collector accepts it.
    #[default]
    Instant,
    /// Sleep for the recorded gap between steps that carry a timestamp.
    Realtime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub delivered: usize,
    pub skipped: usize,
    pub load_fired: bool,
}

/// Serves a recorded [`Trace`] through the [`ObservationSource`] interface.
#[derive(Debug)]
pub struct TraceSource {
    trace: Trace,
    subscriptions: BTreeMap<EntryCategory, (mpsc::Sender<EntryBatch>, ObserveOptions)>,
    load_tx: Option<oneshot::Sender<()>>,
}

impl TraceSource {
    #[must_use]
    pub fn new(trace: Trace) -> Self {
        Self {
            trace,
            subscriptions: BTreeMap::new(),
            load_tx: None,
        }
    }

    /// Spawns delivery of the recorded steps to the current subscribers.
    /// Streams close when the replay ends; an unfired load signal is dropped.
    #[must_use]
    pub fn replay(self, pace: Pace) -> JoinHandle<ReplayStats> {
        tokio::spawn(run_replay(
            self.trace.steps,
            self.subscriptions,
            self.load_tx,
            pace,
        ))
    }
}

impl ObservationSource for TraceSource {
    fn observe(
        &mut self,
        category: EntryCategory,
        options: ObserveOptions,
    ) -> Result<mpsc::Receiver<EntryBatch>, ObserveError> {
        if let Some(message) = self.trace.failures.get(&category) {
            return Err(ObserveError::Setup {
                category,
                message: message.clone(),
            });
        }
        if self
            .trace
            .supported
            .as_ref()
            .is_some_and(|supported| !supported.contains(&category))
        {
            return Err(ObserveError::Unsupported { category });
        }
        let (batch_tx, batch_rx) = mpsc::channel(BATCH_CHANNEL_CAPACITY);
        self.subscriptions.insert(category, (batch_tx, options));
        Ok(batch_rx)
    }

    fn navigation_entries(&mut self) -> Result<Vec<NavigationEntry>, ObserveError> {
        if let Some(message) = self.trace.navigation_failure.take() {
            return Err(ObserveError::TableUnavailable {
                table: SourceTable::Navigation,
                message,
            });
        }
        Ok(std::mem::take(&mut self.trace.navigation))
    }

    fn resource_entries(&mut self) -> Result<Vec<ResourceEntry>, ObserveError> {
        if let Some(message) = self.trace.resource_failure.take() {
            return Err(ObserveError::TableUnavailable {
                table: SourceTable::Resource,
                message,
            });
        }
        Ok(std::mem::take(&mut self.trace.resources))
    }

    fn load_signal(&mut self) -> oneshot::Receiver<()> {
        let (load_tx, load_rx) = oneshot::channel();
        self.load_tx = Some(load_tx);
        load_rx
    }
}

async fn run_replay(
    steps: Vec<TraceStep>,
    subscriptions: BTreeMap<EntryCategory, (mpsc::Sender<EntryBatch>, ObserveOptions)>,
    mut load_tx: Option<oneshot::Sender<()>>,
    pace: Pace,
) -> ReplayStats {
    let mut stats = ReplayStats::default();
    let mut last_at: Option<f64> = None;

    for step in steps {
        if pace == Pace::Realtime {
            pace_step(&mut last_at, step.at()).await;
        }
        match step {
            TraceStep::Batch { batch, .. } => {
                let category = batch.category();
                let Some((batch_tx, options)) = subscriptions.get(&category) else {
                    stats.skipped = stats.skipped.saturating_add(1);
                    continue;
                };
                let batch = batch.filtered(options);
                if batch.is_empty() {
                    tracing::debug!("{} batch empty after filtering; not delivered", category);
                    stats.skipped = stats.skipped.saturating_add(1);
                    continue;
                }
                if batch_tx.send(batch).await.is_err() {
                    tracing::debug!("{} subscriber went away", category);
                    stats.skipped = stats.skipped.saturating_add(1);
                    continue;
                }
                stats.delivered = stats.delivered.saturating_add(1);
            }
            TraceStep::Load { .. } => {
                if let Some(sender) = load_tx.take() {
                    stats.load_fired = sender.send(()).is_ok();
                }
            }
        }
    }

    tracing::debug!(
        "Replay finished: {} delivered, {} skipped",
        stats.delivered,
        stats.skipped
    );
    stats
}

async fn pace_step(last_at: &mut Option<f64>, at: Option<f64>) {
    let Some(at) = at else {
        return;
    };
    if let Some(previous) = *last_at {
        let gap_ms = at - previous;
        if gap_ms > 0.0
            && let Ok(gap) = Duration::try_from_secs_f64(gap_ms / 1000.0)
        {
            tokio::time::sleep(gap).await;
        }
    }
    *last_at = Some(at);
}
