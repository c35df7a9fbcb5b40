use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SinksConfig {
    pub prometheus: Option<PrometheusSinkConfig>,
    pub influx: Option<InfluxSinkConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrometheusSinkConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InfluxSinkConfig {
    pub path: String,
}
