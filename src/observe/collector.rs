use std::time::Duration;

use futures_util::stream::{self, BoxStream, SelectAll, StreamExt};
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
    time::Instant,
};

use crate::shutdown::{ShutdownReceiver, ShutdownSender};
use crate::vitals::{VitalsEngine, VitalsReport, VitalsSnapshot};

use super::{EntryBatch, EntryCategory, ObservationSource};

/// Quiet period after the load signal before the collection counts as stable.
pub const SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Handle to a running collector task.
#[derive(Debug)]
pub struct VitalsCollector {
    /// Resolves to the final report once the task stops.
    pub handle: JoinHandle<VitalsReport>,
    /// Latest snapshot, republished after every state change.
    pub snapshots: watch::Receiver<VitalsSnapshot>,
}

/// Installs every collector against `source` and spawns the task that owns
/// the resulting state.
///
/// Each subscription is attempted once. Failures land in the error sink and
/// leave the other collectors untouched. The task stops on shutdown, or once
/// every stream has closed and the collection is either stable or can no
/// longer become stable.
#[must_use]
pub fn setup_vitals_collector<S>(source: &mut S, shutdown_tx: &ShutdownSender) -> VitalsCollector
where
    S: ObservationSource + ?Sized,
{
    let mut engine = VitalsEngine::new();
    let mut receivers = Vec::with_capacity(EntryCategory::ALL.len());

    for category in EntryCategory::ALL {
        match source.observe(category, category.options()) {
            Ok(receiver) => {
                engine.activate(category);
                receivers.push(receiver);
            }
            Err(err) => engine.record_failure(&err),
        }
    }

    match source.navigation_entries() {
        Ok(entries) => engine.read_navigation(&entries),
        Err(err) => engine.record_failure(&err),
    }
    match source.resource_entries() {
        Ok(entries) => engine.read_resources(&entries),
        Err(err) => engine.record_failure(&err),
    }

    let load_rx = source.load_signal();
    let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());
    let shutdown_rx = shutdown_tx.subscribe();

    let handle = tokio::spawn(run_collector(
        engine,
        receivers,
        load_rx,
        snapshot_tx,
        shutdown_rx,
    ));

    VitalsCollector {
        handle,
        snapshots: snapshot_rx,
    }
}

fn batch_stream(receiver: mpsc::Receiver<EntryBatch>) -> BoxStream<'static, EntryBatch> {
    stream::unfold(receiver, |mut receiver| async move {
        receiver.recv().await.map(|batch| (batch, receiver))
    })
    .boxed()
}

async fn run_collector(
    mut engine: VitalsEngine,
    receivers: Vec<mpsc::Receiver<EntryBatch>>,
    mut load_rx: oneshot::Receiver<()>,
    snapshot_tx: watch::Sender<VitalsSnapshot>,
    mut shutdown_rx: ShutdownReceiver,
) -> VitalsReport {
    let mut batches: SelectAll<BoxStream<'static, EntryBatch>> =
        stream::select_all(receivers.into_iter().map(batch_stream));
    let mut batches_open = !batches.is_empty();
    let mut load_pending = true;
    let mut settle_armed = false;
    let settle_timer = tokio::time::sleep(Duration::ZERO);
    tokio::pin!(settle_timer);

    loop {
        let can_settle = load_pending || settle_armed;
        if !batches_open && (engine.store().is_collected() || !can_settle) {
            break;
        }

        tokio::select! {
            _ = shutdown_rx.recv() => break,
            maybe_batch = batches.next(), if batches_open => {
                let Some(batch) = maybe_batch else {
                    tracing::debug!("All entry streams closed");
                    batches_open = false;
                    continue;
                };
                if engine.handle_batch(&batch) {
                    snapshot_tx.send_replace(engine.snapshot());
                }
            },
            result = &mut load_rx, if load_pending => {
                load_pending = false;
                if result.is_err() {
                    tracing::debug!("Load signal dropped; collection will not settle");
                    continue;
                }
                tracing::debug!("Load signal received; settling for {:?}", SETTLE_DELAY);
                settle_timer.as_mut().reset(Instant::now() + SETTLE_DELAY);
                settle_armed = true;
            },
            () = &mut settle_timer, if settle_armed => {
                settle_armed = false;
                if engine.mark_collected() {
                    tracing::info!("Vitals collection settled");
                    snapshot_tx.send_replace(engine.snapshot());
                }
            },
        }
    }

    engine.report()
}
