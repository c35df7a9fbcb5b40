use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, oneshot};

use super::{
    EntryBatch, EntryCategory, ObservationSource, ObserveOptions, SETTLE_DELAY,
    VitalsCollector, setup_vitals_collector,
};
use crate::error::{AppError, AppResult, ObserveError, SourceTable};
use crate::shutdown::shutdown_channel;
use crate::vitals::{ErrorScope, MetricKind, NavigationEntry, PaintEntry, ResourceEntry};

/// Hand-driven source: the test pushes batches and fires load itself.
struct ScriptedSource {
    failures: BTreeMap<EntryCategory, ObserveError>,
    navigation: Result<Vec<NavigationEntry>, ObserveError>,
    resources: Result<Vec<ResourceEntry>, ObserveError>,
    senders: BTreeMap<EntryCategory, mpsc::Sender<EntryBatch>>,
    options: BTreeMap<EntryCategory, ObserveOptions>,
    load_tx: Option<oneshot::Sender<()>>,
}

impl ScriptedSource {
    fn new() -> Self {
        Self {
            failures: BTreeMap::new(),
            navigation: Ok(Vec::new()),
            resources: Ok(Vec::new()),
            senders: BTreeMap::new(),
            options: BTreeMap::new(),
            load_tx: None,
        }
    }

    fn failing(mut self, category: EntryCategory, error: ObserveError) -> Self {
        self.failures.insert(category, error);
        self
    }

    async fn send(&self, batch: EntryBatch) -> AppResult<()> {
        let category = batch.category();
        let sender = self
            .senders
            .get(&category)
            .ok_or_else(|| AppError::validation(format!("No subscription for {}", category)))?;
        sender
            .send(batch)
            .await
            .map_err(|err| AppError::validation(format!("Send failed: {}", err)))
    }

    fn fire_load(&mut self) -> AppResult<()> {
        let load_tx = self
            .load_tx
            .take()
            .ok_or_else(|| AppError::validation("Load signal not requested"))?;
        load_tx
            .send(())
            .map_err(|()| AppError::validation("Collector dropped the load signal"))
    }

    fn close_streams(&mut self) {
        self.senders.clear();
    }
}

impl ObservationSource for ScriptedSource {
    fn observe(
        &mut self,
        category: EntryCategory,
        options: ObserveOptions,
    ) -> Result<mpsc::Receiver<EntryBatch>, ObserveError> {
        self.options.insert(category, options);
        if let Some(error) = self.failures.get(&category) {
            return Err(error.clone());
        }
        let (batch_tx, batch_rx) = mpsc::channel(8);
        self.senders.insert(category, batch_tx);
        Ok(batch_rx)
    }

    fn navigation_entries(&mut self) -> Result<Vec<NavigationEntry>, ObserveError> {
        std::mem::replace(&mut self.navigation, Ok(Vec::new()))
    }

    fn resource_entries(&mut self) -> Result<Vec<ResourceEntry>, ObserveError> {
        std::mem::replace(&mut self.resources, Ok(Vec::new()))
    }

    fn load_signal(&mut self) -> oneshot::Receiver<()> {
        let (load_tx, load_rx) = oneshot::channel();
        self.load_tx = Some(load_tx);
        load_rx
    }
}

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: std::future::Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(future)
}

fn paint(name: &str, start_time: f64) -> PaintEntry {
    PaintEntry {
        name: Some(name.to_owned()),
        start_time,
        duration: 0.0,
    }
}

#[test]
fn failed_subscription_is_isolated() -> AppResult<()> {
    run_async_test(async {
        let mut source = ScriptedSource::new().failing(
            EntryCategory::LayoutShift,
            ObserveError::Setup {
                category: EntryCategory::LayoutShift,
                message: "observer threw".to_owned(),
            },
        );
        let shutdown_tx = shutdown_channel();
        let VitalsCollector { handle, .. } = setup_vitals_collector(&mut source, &shutdown_tx);

        source
            .send(EntryBatch::LargestContentfulPaint(vec![paint("hero", 1900.0)]))
            .await?;
        source
            .send(EntryBatch::Paint(vec![paint("first-contentful-paint", 800.0)]))
            .await?;
        source.close_streams();
        drop(source);

        let report = handle.await?;
        let snapshot = &report.snapshot;
        if snapshot.cls.is_some() {
            return Err(AppError::validation("CLS must stay absent"));
        }
        match snapshot.errors.as_slice() {
            [record] if record.metric == ErrorScope::Metric(MetricKind::Cls) => {}
            other => {
                return Err(AppError::validation(format!(
                    "Unexpected errors: {:?}",
                    other
                )));
            }
        }
        if report.summary.lcp != Some(1900.0) || report.summary.fcp != Some(800.0) {
            return Err(AppError::validation(format!(
                "Other metrics should populate: {:?}",
                report.summary
            )));
        }
        Ok(())
    })
}

#[test]
fn unsupported_long_tasks_are_silent() -> AppResult<()> {
    run_async_test(async {
        let mut source = ScriptedSource::new().failing(
            EntryCategory::LongTask,
            ObserveError::Unsupported {
                category: EntryCategory::LongTask,
            },
        );
        let shutdown_tx = shutdown_channel();
        let VitalsCollector { handle, .. } = setup_vitals_collector(&mut source, &shutdown_tx);
        source.close_streams();
        drop(source);

        let report = handle.await?;
        if !report.snapshot.errors.is_empty() {
            return Err(AppError::validation(format!(
                "Long task support is optional: {:?}",
                report.snapshot.errors
            )));
        }
        Ok(())
    })
}

#[test]
fn table_failures_are_recorded() -> AppResult<()> {
    run_async_test(async {
        let mut source = ScriptedSource::new();
        source.navigation = Err(ObserveError::TableUnavailable {
            table: SourceTable::Navigation,
            message: "denied".to_owned(),
        });
        source.resources = Ok(vec![ResourceEntry {
            name: "https://cdn.test/app.js".to_owned(),
            initiator_type: "script".to_owned(),
            duration: 240.0,
            ..ResourceEntry::default()
        }]);
        let shutdown_tx = shutdown_channel();
        let VitalsCollector { handle, .. } = setup_vitals_collector(&mut source, &shutdown_tx);
        source.close_streams();
        drop(source);

        let report = handle.await?;
        let scopes: Vec<ErrorScope> = report
            .snapshot
            .errors
            .iter()
            .map(|record| record.metric)
            .collect();
        if scopes != [ErrorScope::Metric(MetricKind::Ttfb)] {
            return Err(AppError::validation(format!("Unexpected scopes: {:?}", scopes)));
        }
        if report.summary.ttfb.is_some() || report.summary.slow_resources != 1 {
            return Err(AppError::validation(format!(
                "Unexpected summary: {:?}",
                report.summary
            )));
        }
        Ok(())
    })
}

#[test]
fn event_subscription_carries_duration_threshold() -> AppResult<()> {
    run_async_test(async {
        let mut source = ScriptedSource::new();
        let shutdown_tx = shutdown_channel();
        let VitalsCollector { handle, .. } = setup_vitals_collector(&mut source, &shutdown_tx);

        if source.options.len() != EntryCategory::ALL.len() {
            return Err(AppError::validation("Every category should be requested"));
        }
        for (category, options) in &source.options {
            let expected = if *category == EntryCategory::Event {
                Some(16.0)
            } else {
                None
            };
            if !options.buffered || options.duration_threshold != expected {
                return Err(AppError::validation(format!(
                    "Unexpected options for {}: {:?}",
                    category, options
                )));
            }
        }
        source.close_streams();
        drop(source);
        handle.await?;
        Ok(())
    })
}

#[test]
fn collected_waits_for_settle_delay_after_load() -> AppResult<()> {
    run_async_test(async {
        let mut source = ScriptedSource::new();
        let shutdown_tx = shutdown_channel();
        let VitalsCollector {
            handle,
            mut snapshots,
        } = setup_vitals_collector(&mut source, &shutdown_tx);

        if snapshots.borrow().collected {
            return Err(AppError::validation("Collected before load"));
        }
        source
            .send(EntryBatch::LargestContentfulPaint(vec![paint("hero", 1200.0)]))
            .await?;

        let load_at = Instant::now();
        source.fire_load()?;
        tokio::time::sleep(Duration::from_millis(300)).await;
        if snapshots.borrow().collected {
            return Err(AppError::validation("Collected before settle delay"));
        }

        while !snapshots.borrow_and_update().collected {
            snapshots
                .changed()
                .await
                .map_err(|err| AppError::validation(format!("Collector stopped: {}", err)))?;
        }
        if load_at.elapsed() < SETTLE_DELAY {
            return Err(AppError::validation(format!(
                "Settled after {:?}",
                load_at.elapsed()
            )));
        }

        source.close_streams();
        drop(source);
        let report = handle.await?;
        if !report.snapshot.collected || report.summary.lcp != Some(1200.0) {
            return Err(AppError::validation("Final report should stay collected"));
        }
        Ok(())
    })
}

#[test]
fn dropped_load_signal_ends_uncollected() -> AppResult<()> {
    run_async_test(async {
        let mut source = ScriptedSource::new();
        let shutdown_tx = shutdown_channel();
        let VitalsCollector { handle, .. } = setup_vitals_collector(&mut source, &shutdown_tx);
        source.close_streams();
        drop(source);

        let report = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .map_err(|err| AppError::validation(format!("Collector kept running: {}", err)))??;
        if report.snapshot.collected {
            return Err(AppError::validation("Load never fired"));
        }
        Ok(())
    })
}

#[test]
fn shutdown_stops_collector_with_open_streams() -> AppResult<()> {
    run_async_test(async {
        let mut source = ScriptedSource::new();
        let shutdown_tx = shutdown_channel();
        let VitalsCollector { handle, .. } = setup_vitals_collector(&mut source, &shutdown_tx);
        source
            .send(EntryBatch::Paint(vec![paint("first-contentful-paint", 640.0)]))
            .await?;
        tokio::time::sleep(Duration::from_millis(50)).await;

        drop(shutdown_tx.send(()));
        let report = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .map_err(|err| AppError::validation(format!("Shutdown ignored: {}", err)))??;
        if report.summary.fcp != Some(640.0) {
            return Err(AppError::validation("Batches before shutdown should count"));
        }
        drop(source);
        Ok(())
    })
}

#[test]
fn snapshots_follow_each_batch() -> AppResult<()> {
    run_async_test(async {
        let mut source = ScriptedSource::new();
        let shutdown_tx = shutdown_channel();
        let VitalsCollector {
            handle,
            mut snapshots,
        } = setup_vitals_collector(&mut source, &shutdown_tx);
        snapshots.borrow_and_update();

        for start_time in [900.0, 1500.0] {
            source
                .send(EntryBatch::LargestContentfulPaint(vec![paint("img", start_time)]))
                .await?;
            snapshots
                .changed()
                .await
                .map_err(|err| AppError::validation(format!("Collector stopped early: {}", err)))?;
            let lcp = snapshots
                .borrow_and_update()
                .lcp
                .as_ref()
                .map(|record| record.value);
            if lcp != Some(start_time) {
                return Err(AppError::validation(format!("Unexpected LCP: {:?}", lcp)));
            }
        }

        source.close_streams();
        drop(source);
        handle.await?;
        Ok(())
    })
}
