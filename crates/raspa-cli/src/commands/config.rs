use crate::cli::{ConfigArgs, ConfigCommands, GlobalArgs};
use crate::config::{LoadedConfig, store};
use crate::error::{CliError, Result};
use raspa_client::core::transport::http::validate_base_url;
use std::path::PathBuf;

pub async fn run(args: ConfigArgs, global: &GlobalArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Path => handle_path(global),
        ConfigCommands::Show => handle_show(global),
        ConfigCommands::SetServer { url } => handle_set_server(global, &url),
        ConfigCommands::Reset => handle_reset(global),
    }
}

fn target_path(global: &GlobalArgs) -> Result<PathBuf> {
    match &global.config {
        Some(path) => Ok(path.clone()),
        None => store::default_config_path(),
    }
}

fn handle_path(global: &GlobalArgs) -> Result<()> {
    let path = target_path(global)?;
    if path.exists() {
        println!("{}", path.display());
    } else {
        println!("{} (not created yet)", path.display());
    }
    Ok(())
}

fn handle_show(global: &GlobalArgs) -> Result<()> {
    let config = LoadedConfig::load(global.config.as_deref())?;
    match &config.source {
        Some(path) => println!("# {}", path.display()),
        None => println!("# No configuration file found; built-in defaults apply."),
    }
    print!("{}", config.file.to_toml()?);
    Ok(())
}

fn handle_set_server(global: &GlobalArgs, url: &str) -> Result<()> {
    let url = validate_base_url(url).map_err(|e| CliError::Argument(e.to_string()))?;
    let path = target_path(global)?;
    store::set_server(&path, &url)?;
    println!("Server URL set to: {}", url);
    Ok(())
}

fn handle_reset(global: &GlobalArgs) -> Result<()> {
    let path = target_path(global)?;
    if store::reset(&path)? {
        println!("Removed configuration file: {}", path.display());
    } else {
        println!("No configuration file at {}; nothing to reset.", path.display());
    }
    Ok(())
}
