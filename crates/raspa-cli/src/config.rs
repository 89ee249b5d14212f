pub mod file;
pub mod store;

use crate::cli::InputArgs;
use crate::error::{CliError, Result};
use file::ConfigFile;
use raspa_client::core::models::inputs::SimulationInputs;
use raspa_client::engine::client::DEFAULT_NPROC;
use raspa_client::engine::config::{ClientConfig, ClientConfigBuilder};
use raspa_client::workflows::run::{DEFAULT_POLL_INTERVAL, DEFAULT_RESULTS_PATH, RunOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// The configuration file in effect, together with where it came from.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub file: ConfigFile,
    pub source: Option<PathBuf>,
}

impl LoadedConfig {
    /// Loads `explicit` when given (it must exist), otherwise the per-user file if there
    /// is one, otherwise an empty configuration.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self {
                file: ConfigFile::from_file(path)?,
                source: Some(path.to_path_buf()),
            });
        }

        match store::default_config_path() {
            Ok(path) if path.exists() => Ok(Self {
                file: ConfigFile::from_file(&path)?,
                source: Some(path),
            }),
            _ => {
                debug!("No configuration file found; using built-in defaults.");
                Ok(Self::default())
            }
        }
    }

    pub fn client_config(&self, server_override: Option<&str>) -> Result<ClientConfig> {
        let server = server_override
            .or(self.file.server_url.as_deref())
            .ok_or_else(|| {
                CliError::Config(
                    "No server URL configured. Pass --server or run 'raspa config set-server <URL>'."
                        .to_string(),
                )
            })?;

        ClientConfigBuilder::new()
            .base_url(server)
            .request_timeout(self.file.request_timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Combines the input flags with the `[inputs]` section. Relative paths taken from the
    /// file are resolved against the directory containing it.
    pub fn inputs(&self, args: &InputArgs) -> Result<SimulationInputs> {
        let section = self.file.inputs.clone().unwrap_or_default();
        let base_dir = self.source.as_deref().and_then(Path::parent);

        let pick = |cli: &Option<PathBuf>, from_file: Option<PathBuf>, key: &str| -> Result<PathBuf> {
            if let Some(path) = cli {
                return Ok(path.clone());
            }
            match (from_file, base_dir) {
                (Some(path), Some(dir)) if path.is_relative() => Ok(dir.join(path)),
                (Some(path), _) => Ok(path),
                (None, _) => Err(CliError::Config(format!(
                    "Input '{}' is required either in the [inputs] section of the config file or via --{}.",
                    key,
                    flag_for(key)
                ))),
            }
        };

        Ok(SimulationInputs::new(
            pick(&args.mixing_rules, section.mixing_rules, "force-field-mixing-rules")?,
            pick(&args.pseudo_atoms, section.pseudo_atoms, "pseudo-atoms")?,
            pick(&args.framework, section.framework, "framework")?,
            pick(&args.adsorbate, section.adsorbate, "adsorbate")?,
            pick(&args.simulation_input, section.simulation_input, "simulation-input")?,
        ))
    }

    pub fn nproc(&self, cli: Option<u32>) -> Result<u32> {
        let nproc = cli
            .or(self.simulation().and_then(|s| s.nproc))
            .unwrap_or(DEFAULT_NPROC);
        if nproc == 0 {
            return Err(CliError::Config(
                "`simulation.nproc` must be at least 1.".to_string(),
            ));
        }
        Ok(nproc)
    }

    pub fn poll_interval(&self, cli: Option<u64>) -> Result<Duration> {
        match cli.or(self.simulation().and_then(|s| s.poll_interval_secs)) {
            Some(0) => Err(CliError::Config(
                "`simulation.poll-interval-secs` must be at least 1.".to_string(),
            )),
            Some(secs) => Ok(Duration::from_secs(secs)),
            None => Ok(DEFAULT_POLL_INTERVAL),
        }
    }

    /// Output archive path. Unlike inputs, a relative path here is relative to the
    /// working directory.
    pub fn output(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.simulation().and_then(|s| s.output.clone()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_PATH))
    }

    pub fn run_options(
        &self,
        nproc: Option<u32>,
        poll_interval: Option<u64>,
        output: Option<&Path>,
    ) -> Result<RunOptions> {
        Ok(RunOptions {
            nproc: self.nproc(nproc)?,
            poll_interval: self.poll_interval(poll_interval)?,
            destination: self.output(output),
        })
    }

    fn simulation(&self) -> Option<&file::FileSimulationConfig> {
        self.file.simulation.as_ref()
    }
}

fn flag_for(key: &str) -> &str {
    match key {
        "force-field-mixing-rules" => "mixing-rules",
        other => other,
    }
}
