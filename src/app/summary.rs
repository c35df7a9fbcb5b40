use crate::vitals::{MetricKind, MetricRecord, VitalsReport};

pub(crate) fn summary_lines(report: &VitalsReport) -> Vec<String> {
    let snapshot = &report.snapshot;
    let summary = &report.summary;
    let mut lines = Vec::new();

    lines.push("Web Vitals:".to_owned());
    for kind in MetricKind::ALL {
        lines.push(metric_line(kind, snapshot.metric(kind)));
    }

    lines.push(format!("Layout Shifts: {}", summary.layout_shift_count));
    lines.push(format!("Long Tasks: {}", summary.long_task_count));
    lines.push(format!("Slow Resources: {}", summary.slow_resources));
    for resource in &snapshot.resource_timings {
        lines.push(format!(
            "  {}ms {} {}",
            format_ms(resource.duration),
            resource.initiator_type,
            resource.name
        ));
    }

    if !snapshot.errors.is_empty() {
        lines.push("Unavailable Collectors:".to_owned());
        for record in &snapshot.errors {
            lines.push(format!("  {}: {}", record.metric, record.error));
        }
    }

    lines.push(format!(
        "Collected: {}",
        if snapshot.collected { "yes" } else { "no" }
    ));
    lines
}

pub(crate) fn print_summary(report: &VitalsReport) {
    for line in summary_lines(report) {
        println!("{}", line);
    }
}

fn metric_line(kind: MetricKind, record: Option<&MetricRecord>) -> String {
    record.map_or_else(
        || format!("{}: n/a", kind),
        |record| {
            format!(
                "{}: {} ({})",
                kind,
                format_value(kind, record.value),
                record.rating
            )
        },
    )
}

fn format_value(kind: MetricKind, value: f64) -> String {
    if kind.is_timing() {
        format!("{}ms", format_ms(value))
    } else {
        format!("{:.3}", value)
    }
}

fn format_ms(value: f64) -> String {
    format!("{:.0}", value)
}
