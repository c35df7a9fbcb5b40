use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::{AppError, AppResult, TraceError};
use crate::observe::EntryCategory;
use crate::vitals::{NavigationEntry, ResourceEntry};

use super::records::{SessionRecord, Trace, TraceStep, decode_batch};

const NAVIGATION_ENTRY_TYPE: &str = "navigation";
const RESOURCE_ENTRY_TYPE: &str = "resource";

/// Parses a `.jsonl` session recording. Blank lines are skipped.
pub(super) fn parse_session(content: &str) -> AppResult<Trace> {
    let mut trace = Trace::default();
    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let line_number = idx.saturating_add(1);
        let parse_error = |err| {
            AppError::trace(TraceError::ParseLine {
                line: line_number,
                source: err,
            })
        };
        let record: SessionRecord = serde_json::from_str(trimmed).map_err(parse_error)?;
        apply_record(&mut trace, record).map_err(parse_error)?;
    }
    Ok(trace)
}

fn apply_record(trace: &mut Trace, record: SessionRecord) -> Result<(), serde_json::Error> {
    match record {
        SessionRecord::Supported { entry_types } => {
            let supported: BTreeSet<EntryCategory> = entry_types
                .iter()
                .filter_map(|name| EntryCategory::from_name(name))
                .collect();
            trace.supported = Some(supported);
        }
        SessionRecord::Batch(batch) => {
            let decoded = decode_batch(batch.entry_type, batch.entries)?;
            trace.steps.push(TraceStep::Batch {
                at: batch.at,
                batch: decoded,
            });
        }
        SessionRecord::Navigation(entry) => trace.navigation.push(entry),
        SessionRecord::Resource(entry) => trace.resources.push(entry),
        SessionRecord::Load { at } => trace.steps.push(TraceStep::Load { at }),
        SessionRecord::Error {
            entry_type,
            message,
        } => match entry_type.as_str() {
            NAVIGATION_ENTRY_TYPE => trace.navigation_failure = Some(message),
            RESOURCE_ENTRY_TYPE => trace.resource_failure = Some(message),
            other => {
                let Some(category) = EntryCategory::from_name(other) else {
                    tracing::debug!("Ignoring failure record for '{}'", other);
                    return Ok(());
                };
                trace.failures.insert(category, message);
            }
        },
    }
    Ok(())
}

/// Parses a `.json` array of raw performance entries. Entries are grouped into
/// one buffered batch per observed type, in order of first appearance, and the
/// page is treated as already loaded.
pub(super) fn parse_entry_dump(content: &str) -> Result<Trace, serde_json::Error> {
    let raw: Vec<Value> = serde_json::from_str(content)?;
    let mut trace = Trace::default();
    let mut groups: Vec<(EntryCategory, Vec<Value>)> = Vec::new();

    for entry in raw {
        let entry_type = entry
            .get("entryType")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        match entry_type.as_str() {
            NAVIGATION_ENTRY_TYPE => {
                trace
                    .navigation
                    .push(serde_json::from_value::<NavigationEntry>(entry)?);
            }
            RESOURCE_ENTRY_TYPE => {
                trace
                    .resources
                    .push(serde_json::from_value::<ResourceEntry>(entry)?);
            }
            other => {
                let Some(category) = EntryCategory::from_name(other) else {
                    continue;
                };
                if let Some((_, entries)) =
                    groups.iter_mut().find(|(existing, _)| *existing == category)
                {
                    entries.push(entry);
                    continue;
                }
                groups.push((category, vec![entry]));
            }
        }
    }

    for (category, entries) in groups {
        trace.steps.push(TraceStep::Batch {
            at: None,
            batch: decode_batch(category, entries)?,
        });
    }
    trace.steps.push(TraceStep::Load { at: None });
    Ok(trace)
}
