use clap::Parser;
use std::time::Duration;

use crate::sinks::config::SinksConfig;
use crate::vitals::Rating;

use super::parsers::{parse_bool_env, parse_duration_arg};
use super::types::OutputFormat;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Core Web Vitals aggregation engine - derives LCP, CLS, INP, FCP, TTFB and FID from recorded browser performance entries, rates them, and reports diagnostics."
)]
pub struct VitalsArgs {
    /// Recorded trace to replay (.jsonl session recording or .json entry dump)
    #[arg(long = "trace", short = 'f')]
    pub trace: Option<String>,

    /// Path to config file (TOML/JSON). Defaults to ./vitalscope.toml or ./vitalscope.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Summary output format
    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Export the full report (summary + snapshot) to JSON
    #[arg(long = "export-json")]
    pub export_json: Option<String>,

    /// Replay with the recorded gaps between steps instead of as fast as possible
    #[arg(long = "realtime")]
    pub realtime: bool,

    /// Stop waiting for the collection to settle after this long (supports ms/s/m/h)
    #[arg(long = "max-wait", default_value = "10s", value_parser = parse_duration_arg)]
    pub max_wait: Duration,

    /// Exit with an error when any rated metric is at or worse than this rating
    #[arg(long = "fail-on", value_enum)]
    pub fail_on: Option<Rating>,

    /// Enable verbose logging (sets log level to debug unless overridden by VITALSCOPE_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,

    #[arg(skip)]
    pub sinks: Option<SinksConfig>,
}
