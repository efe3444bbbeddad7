use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub listener: Listener,
    pub tracker: TrackerConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }
}

/// Network listener configuration
#[derive(Debug, Deserialize)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 5000,
        }
    }
}

/// Remote tracking API configuration. Immutable for the process lifetime and
/// passed explicitly into everything that issues upstream calls.
#[derive(Debug, Deserialize)]
pub struct TrackerConfig {
    /// Base URL of the remote tracking API
    pub base_url: Url,
    /// Static token attached to every upstream call
    pub token: String,
    /// Timeout for each upstream call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Page size for collection fetches; effectively unbounded for expected
    /// data volumes
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: u32,
    /// Cap on the id list accepted by the jira-counts endpoint, since it
    /// issues one upstream call per id
    #[serde(default = "default_jira_counts_max_ids")]
    pub jira_counts_max_ids: usize,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_fetch_limit() -> u32 {
    1000
}

fn default_jira_counts_max_ids() -> usize {
    50
}
