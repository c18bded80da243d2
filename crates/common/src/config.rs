use std::{
    fs::File,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use url::Url;

/// Deadline of a single outbound relay request.
pub const DEFAULT_RELAY_TIMEOUT_MS: u64 = 3_000;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct KettleConfig {
    pub relay: RelayConfig,
    /// Endpoint receiving signed JSON-RPC bundles, eg. a mev-share node.
    #[serde(default)]
    pub bundle_relay_url: Option<Url>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KettleConfig {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let file = File::open(path)?;
        let config: KettleConfig = serde_yaml::from_reader(file)?;
        Ok(config)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RelayConfig {
    pub url: Url,
    #[serde(default = "default_relay_timeout_ms")]
    pub timeout_ms: u64,
}

impl RelayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Default, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum LoggingConfig {
    #[default]
    Console,
    File {
        dir_path: PathBuf,
        file_name: String,
    },
}

fn default_relay_timeout_ms() -> u64 {
    DEFAULT_RELAY_TIMEOUT_MS
}
