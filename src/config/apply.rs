use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::VitalsArgs;
use crate::error::AppResult;

use super::parse::parse_duration_value;
use super::types::ConfigFile;

/// Applies configuration values to CLI arguments. Options set explicitly on
/// the command line win.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut VitalsArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "trace")
        && let Some(trace) = config.trace.clone()
    {
        args.trace = Some(trace);
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    if !is_cli(matches, "export_json")
        && let Some(path) = config.export_json.clone()
    {
        args.export_json = Some(path);
    }

    if !is_cli(matches, "realtime")
        && let Some(realtime) = config.realtime
    {
        args.realtime = realtime;
    }

    if !is_cli(matches, "max_wait")
        && let Some(max_wait) = config.max_wait.as_ref()
    {
        args.max_wait = parse_duration_value(max_wait, "max_wait")?;
    }

    if !is_cli(matches, "fail_on")
        && let Some(rating) = config.fail_on
    {
        args.fail_on = Some(rating);
    }

    if let Some(sinks) = config.sinks.clone() {
        args.sinks = Some(sinks);
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}
