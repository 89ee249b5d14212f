use super::blocking;
use crate::cli::{GlobalArgs, SubmitArgs};
use crate::config::LoadedConfig;
use crate::error::Result;
use raspa_client::engine::client::SimulationClient;
use tracing::info;

pub async fn run(args: SubmitArgs, global: &GlobalArgs) -> Result<()> {
    let config = LoadedConfig::load(global.config.as_deref())?;
    let client_config = config.client_config(global.server.as_deref())?;
    let inputs = config.inputs(&args.inputs)?;
    let nproc = config.nproc(args.nproc)?;

    info!(
        "Submitting simulation to {} with {} process(es).",
        client_config.base_url, nproc
    );
    let handle = blocking(move || {
        let client = SimulationClient::connect(client_config)?;
        Ok(client.submit(&inputs, nproc)?)
    })
    .await?;

    println!("Simulation started. Task ID: {}", handle);
    Ok(())
}
