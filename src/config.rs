use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_NODE_TYPE: &str = "Genera.BatchTester";
pub const DEFAULT_SINK_NODE_TYPE: &str = "Genera.GCPStorageNode";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

/// Where the driver records job metadata so outputs can be correlated with jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_sink_node_type")]
    pub node_type: String,
    /// Receives the job id before each submission.
    #[serde(default = "default_label_slot")]
    pub label_slot: String,
    /// Receives the serialized job list once, before the first submission.
    #[serde(default = "default_job_list_slot")]
    pub job_list_slot: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            node_type: default_sink_node_type(),
            label_slot: default_label_slot(),
            job_list_slot: default_job_list_slot(),
        }
    }
}

/// Batch tester configuration.
///
/// Every field has a default matching the editor extension's node types, so an
/// empty TOML document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default = "default_config_node_type")]
    pub config_node_type: String,
    /// Parameter slot on the configuration node holding the raw JSON.
    #[serde(default = "default_config_slot")]
    pub config_slot: String,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            config_node_type: default_config_node_type(),
            config_slot: default_config_slot(),
            sink: SinkConfig::default(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl BatchConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn without_sink(mut self) -> Self {
        self.sink.enabled = false;
        self
    }

    /// The discovery period. A zero `poll_interval_ms` set in code, bypassing
    /// validation, is treated as 1 ms.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.config_node_type.is_empty() || self.config_slot.is_empty() {
            return Err(ConfigError::Validation(
                "config_node_type and config_slot must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_config_node_type() -> String {
    DEFAULT_CONFIG_NODE_TYPE.to_string()
}

fn default_config_slot() -> String {
    "input".to_string()
}

fn default_true() -> bool {
    true
}

fn default_sink_node_type() -> String {
    DEFAULT_SINK_NODE_TYPE.to_string()
}

fn default_label_slot() -> String {
    "file_name".to_string()
}

fn default_job_list_slot() -> String {
    "config".to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}
