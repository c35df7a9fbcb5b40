mod app;
mod config;
mod observe;
mod sink;
mod trace;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use observe::{ObserveError, SourceTable};
pub use sink::SinkError;
pub use trace::TraceError;
pub use validation::ValidationError;
