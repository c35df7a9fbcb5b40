use std::time::Duration;

use crate::args::parsers::parse_duration_arg;
use crate::error::{AppError, AppResult, ConfigError};

use super::types::DurationValue;

pub(super) fn parse_duration_value(
    value: &DurationValue,
    field: &'static str,
) -> AppResult<Duration> {
    match value {
        DurationValue::Seconds(0) => Err(AppError::config(ConfigError::InvalidField {
            field,
            message: "Duration must be > 0.".to_owned(),
        })),
        DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
        DurationValue::Text(text) => parse_duration_arg(text).map_err(|err| {
            AppError::config(ConfigError::InvalidField {
                field,
                message: err.to_string(),
            })
        }),
    }
}
