use crate::error::{AppError, AppResult, SinkError};
use crate::vitals::{MetricKind, Rating, VitalsReport};

use super::config::{InfluxSinkConfig, PrometheusSinkConfig, SinksConfig};
use super::format::{influx_field, write_line};

/// Write configured sink outputs to their destinations.
///
/// # Errors
///
/// Returns an error if any sink output fails to serialize or write.
pub async fn write_sinks(config: &SinksConfig, report: &VitalsReport) -> AppResult<()> {
    if let Some(prom) = config.prometheus.as_ref() {
        write_prometheus(prom, report).await?;
    }
    if let Some(influx) = config.influx.as_ref() {
        write_influx(influx, report).await?;
    }
    Ok(())
}

/// Renders the report as a Prometheus text exposition.
///
/// # Errors
///
/// Returns an error if a line cannot be appended to the output buffer.
pub fn render_prometheus(report: &VitalsReport) -> AppResult<String> {
    let mut output = String::new();

    write_line(
        &mut output,
        "# HELP vitalscope_metric_value Web vital value (milliseconds for timings, unitless for CLS).",
    )?;
    write_line(&mut output, "# TYPE vitalscope_metric_value gauge")?;
    for record in report.snapshot.metrics() {
        write_line(
            &mut output,
            &format!(
                "vitalscope_metric_value{{metric=\"{}\",rating=\"{}\"}} {}",
                record.kind, record.rating, record.value
            ),
        )?;
    }

    write_line(
        &mut output,
        "# HELP vitalscope_metric_rating Rating bucket of each web vital (1 for the assigned rating).",
    )?;
    write_line(&mut output, "# TYPE vitalscope_metric_rating gauge")?;
    for record in report.snapshot.metrics() {
        for rating in [Rating::Good, Rating::NeedsImprovement, Rating::Poor] {
            let hit = u8::from(record.rating == rating);
            write_line(
                &mut output,
                &format!(
                    "vitalscope_metric_rating{{metric=\"{}\",rating=\"{}\"}} {}",
                    record.kind, rating, hit
                ),
            )?;
        }
    }

    write_line(
        &mut output,
        "# HELP vitalscope_layout_shifts_total Layout shifts counted towards CLS.",
    )?;
    write_line(&mut output, "# TYPE vitalscope_layout_shifts_total counter")?;
    write_line(
        &mut output,
        &format!(
            "vitalscope_layout_shifts_total {}",
            report.summary.layout_shift_count
        ),
    )?;

    write_line(
        &mut output,
        "# HELP vitalscope_long_tasks_total Long tasks observed on the main thread.",
    )?;
    write_line(&mut output, "# TYPE vitalscope_long_tasks_total counter")?;
    write_line(
        &mut output,
        &format!(
            "vitalscope_long_tasks_total {}",
            report.summary.long_task_count
        ),
    )?;

    write_line(
        &mut output,
        "# HELP vitalscope_slow_resources Retained slow resources.",
    )?;
    write_line(&mut output, "# TYPE vitalscope_slow_resources gauge")?;
    write_line(
        &mut output,
        &format!("vitalscope_slow_resources {}", report.summary.slow_resources),
    )?;

    write_line(
        &mut output,
        "# HELP vitalscope_observer_errors_total Observers that failed to set up.",
    )?;
    write_line(&mut output, "# TYPE vitalscope_observer_errors_total counter")?;
    write_line(
        &mut output,
        &format!(
            "vitalscope_observer_errors_total {}",
            report.snapshot.errors.len()
        ),
    )?;

    write_line(
        &mut output,
        "# HELP vitalscope_collected Whether the collection settled after load.",
    )?;
    write_line(&mut output, "# TYPE vitalscope_collected gauge")?;
    write_line(
        &mut output,
        &format!(
            "vitalscope_collected {}",
            u8::from(report.snapshot.collected)
        ),
    )?;

    Ok(output)
}

/// Renders the report as a single Influx line-protocol point.
#[must_use]
pub fn render_influx(report: &VitalsReport) -> String {
    let mut fields: Vec<String> = MetricKind::ALL
        .into_iter()
        .filter_map(|kind| {
            report
                .snapshot
                .metric(kind)
                .map(|record| {
                    format!(
                        "{}={}",
                        influx_field(kind.as_str(), kind.is_timing()),
                        record.value
                    )
                })
        })
        .collect();
    fields.push(format!(
        "layout_shift_count={}i",
        report.summary.layout_shift_count
    ));
    fields.push(format!("long_task_count={}i", report.summary.long_task_count));
    fields.push(format!("slow_resources={}i", report.summary.slow_resources));
    fields.push(format!("errors={}i", report.snapshot.errors.len()));
    fields.push(format!("collected={}", report.snapshot.collected));
    format!("vitalscope_summary {}\n", fields.join(","))
}

async fn write_prometheus(config: &PrometheusSinkConfig, report: &VitalsReport) -> AppResult<()> {
    let output = render_prometheus(report)?;
    tokio::fs::write(&config.path, output)
        .await
        .map_err(|err| AppError::sink(SinkError::WritePrometheus { source: err }))?;
    tracing::debug!("Wrote Prometheus sink to {}", config.path);
    Ok(())
}

async fn write_influx(config: &InfluxSinkConfig, report: &VitalsReport) -> AppResult<()> {
    let line = render_influx(report);
    tokio::fs::write(&config.path, line)
        .await
        .map_err(|err| AppError::sink(SinkError::WriteInflux { source: err }))?;
    tracing::debug!("Wrote Influx sink to {}", config.path);
    Ok(())
}
