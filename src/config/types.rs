use serde::Deserialize;

use crate::args::OutputFormat;
use crate::sinks::config::SinksConfig;
use crate::vitals::Rating;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub trace: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub export_json: Option<String>,
    pub realtime: Option<bool>,
    pub max_wait: Option<DurationValue>,
    pub fail_on: Option<Rating>,
    pub sinks: Option<SinksConfig>,
}

/// A duration given either as whole seconds or as text with a unit (`"1500ms"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}
