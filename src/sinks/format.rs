use std::fmt::Write as _;

use crate::error::{AppError, AppResult, SinkError};

pub(super) fn write_line(output: &mut String, line: &str) -> AppResult<()> {
    writeln!(output, "{}", line).map_err(|err| AppError::sink(SinkError::WriteLine { source: err }))
}

/// Influx field key for a metric, with the unit suffix for timings.
pub(super) fn influx_field(name: &str, timing: bool) -> String {
    let key = name.to_ascii_lowercase();
    if timing { format!("{}_ms", key) } else { key }
}
