//! Job configuration

use serde::Deserialize;

/// Settlement job configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JobsConfig {
    /// Path of the ledger snapshot file
    pub snapshot_path: String,
    /// Log level
    pub log_level: String,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            snapshot_path: "ledger.json".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl JobsConfig {
    /// Loads configuration from `JOBS_`-prefixed environment variables,
    /// falling back to defaults for anything unset
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = JobsConfig::default();
        config::Config::builder()
            .set_default("snapshot_path", defaults.snapshot_path)?
            .set_default("log_level", defaults.log_level)?
            .add_source(config::Environment::with_prefix("JOBS"))
            .build()?
            .try_deserialize()
    }
}
