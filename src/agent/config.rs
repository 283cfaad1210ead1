use {
    super::{
        api,
        metrics,
        state,
        store,
    },
    anyhow::Result,
    config as config_rs,
    config_rs::{
        Environment,
        File,
    },
    serde::Deserialize,
    std::{
        path::Path,
        time::Duration,
    },
};

/// Configuration for all components of the Agent
#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub availability:   state::Config,
    #[serde(default)]
    pub api_server:     api::Config,
    #[serde(default)]
    pub metrics_server: metrics::Config,
    #[serde(default)]
    pub store:          store::Config,
    pub opentelemetry:  Option<OpenTelemetryConfig>,
}

impl Config {
    pub fn new(config_file: impl AsRef<Path>) -> Result<Self> {
        // Build a new configuration object, allowing the default values to be
        // overridden by those in the config_file or "AGENT_"-prefixed environment
        // variables.
        config_rs::Config::builder()
            .add_source(File::from(config_file.as_ref()))
            .add_source(Environment::with_prefix("agent").separator("__"))
            .build()?
            .try_deserialize()
            .map_err(|e| e.into())
    }
}

#[derive(Deserialize, Debug)]
pub struct OpenTelemetryConfig {
    #[serde(with = "humantime_serde")]
    pub exporter_timeout_duration: Duration,
    pub exporter_endpoint:         String,
}
