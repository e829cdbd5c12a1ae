use anyhow::{Context, Result};
use murmur_core::{EventsConfig, LoggingConfig, MurmurConfig};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    core: MurmurConfig,
}

impl CliConfig {
    /// Loads the layered configuration; `explicit` is read last and must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let core = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                MurmurConfig::load_from_paths(vec![path.to_path_buf()])
            }
            None => MurmurConfig::load(),
        }
        .context("Failed to load murmur configuration")?;

        Ok(Self { core })
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.core.logging
    }

    pub fn events(&self) -> &EventsConfig {
        &self.core.events
    }

    pub fn source(&self) -> &str {
        self.core.source()
    }

    pub fn script_path(&self) -> Option<&PathBuf> {
        self.core.scenario.script_path.as_ref()
    }

    /// `--agents` wins over the configured member names.
    pub fn agents(&self, requested: Option<&str>) -> Vec<String> {
        match requested {
            Some(list) => parse_agent_list(list),
            None => self.core.scenario.agents.clone(),
        }
    }
}

fn parse_agent_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
