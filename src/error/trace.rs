use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Failed to read trace '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse trace line {line}: {source}")]
    ParseLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to parse trace '{path}': {source}")]
    ParseDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported trace extension '{ext}'. Use .jsonl or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Trace file must have .jsonl or .json extension.")]
    MissingExtension,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
