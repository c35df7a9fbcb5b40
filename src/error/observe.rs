use std::fmt;

use thiserror::Error;

use crate::observe::EntryCategory;

/// One-shot tables a source exposes next to its entry streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTable {
    Navigation,
    Resource,
}

impl fmt::Display for SourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceTable::Navigation => f.write_str("navigation"),
            SourceTable::Resource => f.write_str("resource"),
        }
    }
}

/// Failure to install a collector. Never fatal: the collector setup turns it
/// into an error-sink entry and carries on with the remaining collectors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ObserveError {
    #[error("The entry type '{category}' is not supported.")]
    Unsupported { category: EntryCategory },
    #[error("Failed to observe '{category}': {message}")]
    Setup {
        category: EntryCategory,
        message: String,
    },
    #[error("The {table} timing table is unavailable: {message}")]
    TableUnavailable { table: SourceTable, message: String },
}
