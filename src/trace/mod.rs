//! Replay of recorded browser performance traces.
//!
//! Two formats are accepted: a `.jsonl` session recording (one tagged record
//! per line) and a `.json` array of raw entries as produced by
//! `JSON.stringify(performance.getEntries())`.
mod parsing;
mod records;
mod source;


use std::path::Path;

use crate::error::{AppError, AppResult, TraceError};

pub use records::{Trace, TraceStep};
pub use source::{Pace, ReplayStats, TraceSource};

/// Reads and parses a trace file, picking the format from its extension.
///
/// # Errors
///
/// Returns an error when the file cannot be read, has an unknown extension,
/// or contains malformed records.
pub fn load_trace(path: &Path) -> AppResult<Trace> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::trace(TraceError::Read {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let trace = match path.extension().and_then(|ext| ext.to_str()) {
        Some("jsonl") => parsing::parse_session(&content)?,
        Some("json") => parsing::parse_entry_dump(&content).map_err(|err| {
            AppError::trace(TraceError::ParseDocument {
                path: path.to_path_buf(),
                source: err,
            })
        })?,
        Some(ext) => {
            return Err(AppError::trace(TraceError::UnsupportedExtension {
                ext: ext.to_owned(),
            }));
        }
        None => return Err(AppError::trace(TraceError::MissingExtension)),
    };
    tracing::debug!(
        "Loaded trace '{}' with {} steps",
        path.display(),
        trace.steps.len()
    );
    Ok(trace)
}
