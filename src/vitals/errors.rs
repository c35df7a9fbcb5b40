use std::fmt;

use serde::Serialize;

use super::types::MetricKind;
use crate::error::ObserveError;

/// What failed to install: a metric collector or the resource table pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum ErrorScope {
    Metric(MetricKind),
    Resources,
}

impl fmt::Display for ErrorScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorScope::Metric(kind) => f.write_str(kind.as_str()),
            ErrorScope::Resources => f.write_str("resources"),
        }
    }
}

impl From<ErrorScope> for String {
    fn from(scope: ErrorScope) -> Self {
        scope.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    pub metric: ErrorScope,
    pub error: String,
}

/// Append-only log of collector install failures.
#[derive(Debug, Clone, Default)]
pub struct ErrorSink {
    records: Vec<ErrorRecord>,
}

impl ErrorSink {
    pub fn push(&mut self, metric: ErrorScope, error: &ObserveError) {
        tracing::warn!("{} collector unavailable: {}", metric, error);
        self.records.push(ErrorRecord {
            metric,
            error: error.to_string(),
        });
    }

    #[must_use]
    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
