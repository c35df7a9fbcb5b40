use std::time::Duration;

use tempfile::tempdir;

use super::export::{export_json, render_export};
use super::gate::check_gate;
use super::run::collect_trace;
use super::summary::summary_lines;
use crate::error::{AppError, AppResult, ValidationError};
use crate::observe::{EntryBatch, EntryCategory};
use crate::trace::{Pace, Trace, TraceStep};
use crate::vitals::{
    EventTimingEntry, LayoutShiftEntry, MetricKind, NavigationEntry, PaintEntry, Rating,
    VitalsEngine, VitalsReport,
};

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: std::future::Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(future)
}

fn paint(start_time: f64) -> PaintEntry {
    PaintEntry {
        name: None,
        start_time,
        duration: 0.0,
    }
}

fn shift(start_time: f64, value: f64) -> LayoutShiftEntry {
    LayoutShiftEntry {
        start_time,
        value,
        ..LayoutShiftEntry::default()
    }
}

fn page_trace() -> Trace {
    Trace {
        navigation: vec![NavigationEntry {
            response_start: 420.0,
            ..NavigationEntry::default()
        }],
        steps: vec![
            TraceStep::Batch {
                at: Some(100.0),
                batch: EntryBatch::Paint(vec![PaintEntry {
                    name: Some("first-contentful-paint".to_owned()),
                    start_time: 900.0,
                    duration: 0.0,
                }]),
            },
            TraceStep::Batch {
                at: Some(200.0),
                batch: EntryBatch::LargestContentfulPaint(vec![paint(1200.0), paint(2100.0)]),
            },
            TraceStep::Batch {
                at: Some(300.0),
                batch: EntryBatch::LayoutShift(vec![shift(1000.0, 0.1), shift(1500.0, 0.2)]),
            },
            TraceStep::Load { at: Some(400.0) },
        ],
        ..Trace::default()
    }
}

fn sample_report() -> VitalsReport {
    let mut engine = VitalsEngine::new();
    engine.activate(EntryCategory::LargestContentfulPaint);
    engine.activate(EntryCategory::Event);
    engine.handle_batch(&EntryBatch::LargestContentfulPaint(vec![paint(1800.0)]));
    engine.handle_batch(&EntryBatch::Event(vec![EventTimingEntry {
        duration: 320.0,
        ..EventTimingEntry::default()
    }]));
    engine.report()
}

#[test]
fn collect_trace_settles_after_load() -> AppResult<()> {
    run_async_test(async {
        let (report, stats) =
            collect_trace(page_trace(), Pace::Instant, Duration::from_secs(10)).await?;
        if !report.snapshot.collected {
            return Err(AppError::validation("Expected collected after load"));
        }
        if !stats.load_fired || stats.delivered != 3 {
            return Err(AppError::validation(format!("Unexpected stats: {:?}", stats)));
        }
        let summary = &report.summary;
        if summary.lcp != Some(2100.0) || summary.fcp != Some(900.0) || summary.ttfb != Some(420.0)
        {
            return Err(AppError::validation(format!("Unexpected summary: {:?}", summary)));
        }
        match summary.cls {
            Some(cls) if (cls - 0.3).abs() < 1e-9 => {}
            other => return Err(AppError::validation(format!("Unexpected CLS: {:?}", other))),
        }
        if summary.ratings.cls != Some(Rating::Poor) {
            return Err(AppError::validation("Expected poor CLS rating"));
        }
        Ok(())
    })
}

#[test]
fn collect_trace_without_load_is_not_collected() -> AppResult<()> {
    run_async_test(async {
        let mut trace = page_trace();
        trace.steps.retain(|step| !matches!(step, TraceStep::Load { .. }));
        let (report, stats) =
            collect_trace(trace, Pace::Instant, Duration::from_secs(10)).await?;
        if report.snapshot.collected || stats.load_fired {
            return Err(AppError::validation("Expected uncollected report"));
        }
        if report.summary.lcp != Some(2100.0) {
            return Err(AppError::validation("Expected LCP without load"));
        }
        Ok(())
    })
}

#[test]
fn collect_trace_short_interactions_leave_inp_absent() -> AppResult<()> {
    run_async_test(async {
        let short = |start_time: f64, duration: f64| EventTimingEntry {
            name: Some("keydown".to_owned()),
            start_time,
            duration,
            ..EventTimingEntry::default()
        };
        let trace = Trace {
            steps: vec![
                TraceStep::Batch {
                    at: Some(100.0),
                    batch: EntryBatch::Event(vec![short(80.0, 8.0), short(90.0, 12.0)]),
                },
                TraceStep::Load { at: Some(200.0) },
            ],
            ..Trace::default()
        };
        let (report, stats) =
            collect_trace(trace, Pace::Instant, Duration::from_secs(10)).await?;
        if stats.delivered != 0 || stats.skipped != 1 {
            return Err(AppError::validation(format!("Unexpected stats: {:?}", stats)));
        }
        if report.snapshot.inp.is_some() || report.summary.inp.is_some() {
            return Err(AppError::validation(format!(
                "INP must stay absent: {:?}",
                report.summary
            )));
        }
        check_gate(&report.snapshot, Rating::Good)?;
        Ok(())
    })
}

#[test]
fn collect_trace_reports_partial_results_on_timeout() -> AppResult<()> {
    run_async_test(async {
        let trace = Trace {
            steps: vec![
                TraceStep::Batch {
                    at: Some(0.0),
                    batch: EntryBatch::LargestContentfulPaint(vec![paint(500.0)]),
                },
                TraceStep::Batch {
                    at: Some(60_000.0),
                    batch: EntryBatch::LargestContentfulPaint(vec![paint(59_000.0)]),
                },
            ],
            ..Trace::default()
        };
        let (report, _) =
            collect_trace(trace, Pace::Realtime, Duration::from_millis(300)).await?;
        if report.summary.lcp != Some(500.0) {
            return Err(AppError::validation(format!(
                "Unexpected LCP: {:?}",
                report.summary.lcp
            )));
        }
        if report.snapshot.collected {
            return Err(AppError::validation("Timed-out run must not be collected"));
        }
        Ok(())
    })
}

#[test]
fn summary_lines_mark_missing_metrics() -> Result<(), String> {
    let lines = summary_lines(&sample_report());
    let expected = [
        "Web Vitals:",
        "LCP: 1800ms (good)",
        "CLS: n/a",
        "INP: 320ms (needs-improvement)",
        "FCP: n/a",
        "TTFB: n/a",
        "FID: n/a",
        "Layout Shifts: 0",
        "Long Tasks: 0",
        "Slow Resources: 0",
        "Collected: no",
    ];
    if lines != expected {
        return Err(format!("Unexpected lines: {:?}", lines));
    }
    Ok(())
}

#[test]
fn gate_fails_on_matching_rating() -> Result<(), String> {
    let report = sample_report();
    match check_gate(&report.snapshot, Rating::NeedsImprovement) {
        Err(AppError::Validation(ValidationError::RatingGate { kind, rating, .. })) => {
            if kind != MetricKind::Inp || rating != Rating::NeedsImprovement {
                return Err(format!("Unexpected gate failure: {} {}", kind, rating));
            }
        }
        Err(err) => return Err(format!("Unexpected error: {}", err)),
        Ok(()) => return Err("Expected gate failure".to_owned()),
    }
    check_gate(&report.snapshot, Rating::Poor).map_err(|err| err.to_string())
}

#[test]
fn export_includes_timestamp_summary_and_snapshot() -> Result<(), String> {
    let json = render_export(&sample_report()).map_err(|err| err.to_string())?;
    let value: serde_json::Value =
        serde_json::from_slice(&json).map_err(|err| format!("invalid json: {}", err))?;
    if !value["generatedAt"].is_string() {
        return Err("Missing generatedAt".to_owned());
    }
    if value["summary"]["LCP"] != serde_json::json!(1800.0) {
        return Err(format!("Unexpected summary: {}", value["summary"]));
    }
    if value["snapshot"]["INP"]["rating"] != "needs-improvement" {
        return Err(format!("Unexpected snapshot: {}", value["snapshot"]));
    }
    if !value["snapshot"]["CLS"].is_null() {
        return Err("CLS should be null".to_owned());
    }
    Ok(())
}

#[test]
fn export_json_writes_file() -> AppResult<()> {
    run_async_test(async {
        let dir = tempdir()?;
        let path = dir.path().join("report.json");
        let path_str = path.to_string_lossy().into_owned();
        export_json(&path_str, &sample_report()).await?;
        let content = std::fs::read_to_string(&path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        if value["summary"]["ratings"]["INP"] != "needs-improvement" {
            return Err(AppError::validation(format!("Unexpected export: {}", content)));
        }
        Ok(())
    })
}
