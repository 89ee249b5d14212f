use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileSimulationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nproc: Option<u32>,
    #[serde(rename = "poll-interval-secs", skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileInputsConfig {
    #[serde(rename = "force-field-mixing-rules", skip_serializing_if = "Option::is_none")]
    pub mixing_rules: Option<PathBuf>,
    #[serde(rename = "pseudo-atoms", skip_serializing_if = "Option::is_none")]
    pub pseudo_atoms: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adsorbate: Option<PathBuf>,
    #[serde(rename = "simulation-input", skip_serializing_if = "Option::is_none")]
    pub simulation_input: Option<PathBuf>,
}

/// On-disk configuration. Every key is optional; command-line flags take precedence.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(rename = "server-url", skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    #[serde(rename = "request-timeout-secs", skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<FileSimulationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<FileInputsConfig>,
}

impl ConfigFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Other(e.into()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        debug!("Configuration written to {:?}", path);
        Ok(())
    }
}
