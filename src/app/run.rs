use std::path::Path;
use std::time::Duration;

use crate::args::{OutputFormat, VitalsArgs};
use crate::error::{AppError, AppResult, ValidationError};
use crate::observe::{VitalsCollector, setup_vitals_collector};
use crate::shutdown::shutdown_channel;
use crate::trace::{Pace, ReplayStats, Trace, TraceSource, load_trace};
use crate::vitals::VitalsReport;

use super::export::{STDOUT_PATH, export_json};
use super::gate::check_gate;
use super::summary::print_summary;

pub(crate) async fn run_trace(args: &VitalsArgs) -> AppResult<()> {
    let trace_path = args
        .trace
        .as_deref()
        .ok_or_else(|| AppError::validation(ValidationError::MissingTrace))?;
    if args.output_format == OutputFormat::Json && args.export_json.as_deref() == Some(STDOUT_PATH)
    {
        return Err(AppError::validation(ValidationError::DuplicateJsonStdout));
    }

    let trace = load_trace(Path::new(trace_path))?;
    let pace = if args.realtime {
        Pace::Realtime
    } else {
        Pace::Instant
    };
    let (report, stats) = collect_trace(trace, pace, args.max_wait).await?;
    tracing::debug!(
        "Replay delivered {} batches ({} skipped), load fired: {}",
        stats.delivered,
        stats.skipped,
        stats.load_fired
    );

    match args.output_format {
        OutputFormat::Text => print_summary(&report),
        OutputFormat::Json => export_json(STDOUT_PATH, &report).await?,
        OutputFormat::Quiet => {}
    }

    if let Some(path) = args.export_json.as_deref() {
        export_json(path, &report).await?;
    }

    if let Some(sinks) = args.sinks.as_ref() {
        crate::sinks::write_sinks(sinks, &report).await?;
    }

    if let Some(gate) = args.fail_on {
        check_gate(&report.snapshot, gate)?;
    }

    Ok(())
}

/// Replays `trace` into a fresh collector and waits for the final report.
/// When the collection has not stopped after `max_wait`, the collector is
/// shut down and reports what it has so far.
pub(crate) async fn collect_trace(
    trace: Trace,
    pace: Pace,
    max_wait: Duration,
) -> AppResult<(VitalsReport, ReplayStats)> {
    let shutdown_tx = shutdown_channel();
    let mut source = TraceSource::new(trace);
    let VitalsCollector { mut handle, .. } = setup_vitals_collector(&mut source, &shutdown_tx);
    let replay = source.replay(pace);

    let report = match tokio::time::timeout(max_wait, &mut handle).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::warn!(
                "Collection did not settle within {:?}; reporting partial results",
                max_wait
            );
            drop(shutdown_tx.send(()));
            replay.abort();
            handle.await?
        }
    };

    let stats = match replay.await {
        Ok(stats) => stats,
        Err(err) if err.is_cancelled() => ReplayStats::default(),
        Err(err) => return Err(err.into()),
    };

    Ok((report, stats))
}
