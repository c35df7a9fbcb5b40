//! File sinks that publish the final vitals report in metrics formats.
pub mod config;
mod format;
mod writers;


pub use writers::{render_influx, render_prometheus, write_sinks};
