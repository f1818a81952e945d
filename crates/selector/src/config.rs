use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use storage::health::DEFAULT_HEALTH_CHECK_TIMEOUT;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub health_check_timeout_secs: u64,
    pub num_nodes: usize,
    pub rendezvous_key: Option<String>,
    pub nodes_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            health_check_timeout_secs: DEFAULT_HEALTH_CHECK_TIMEOUT.as_secs(),
            num_nodes: 0,
            rendezvous_key: None,
            nodes_file: None,
        }
    }
}

impl Config {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };

        config.load_from_env()?;
        Ok(config)
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {path}"))?;

        Ok(config)
    }

    pub fn load_from_env(&mut self) -> Result<()> {
        if let Ok(timeout) = std::env::var("SELECTOR_HEALTH_CHECK_TIMEOUT_SECS") {
            self.health_check_timeout_secs = timeout.parse().with_context(|| {
                format!("Invalid SELECTOR_HEALTH_CHECK_TIMEOUT_SECS: {timeout}")
            })?;
        }

        if let Ok(nodes_file) = std::env::var("SELECTOR_NODES_FILE") {
            self.nodes_file = Some(nodes_file);
        }

        Ok(())
    }

    pub fn health_check_timeout(&self) -> Duration {
        Duration::from_secs(self.health_check_timeout_secs)
    }
}
