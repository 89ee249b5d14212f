use super::file::ConfigFile;
use crate::error::{CliError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Location of the per-user configuration file.
pub fn default_config_path() -> Result<PathBuf> {
    ProjectDirs::from("edu", "caltech", "raspa-client")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
        .ok_or_else(|| CliError::Config("Could not determine config directory path.".to_string()))
}

/// Sets `server-url` in the file at `path`, creating the file if needed and keeping
/// every other setting it holds.
pub fn set_server(path: &Path, url: &str) -> Result<()> {
    let mut config = if path.exists() {
        ConfigFile::from_file(path)?
    } else {
        ConfigFile::default()
    };
    config.server_url = Some(url.to_string());
    config.save(path)?;
    info!("Server URL set to {} in {:?}", url, path);
    Ok(())
}

/// Removes the file at `path`. Returns `false` if there was nothing to remove.
pub fn reset(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    info!("Removed configuration file {:?}", path);
    Ok(true)
}
