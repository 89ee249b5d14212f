use super::blocking;
use crate::cli::{FetchArgs, GlobalArgs};
use crate::config::LoadedConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use raspa_client::core::models::job::JobHandle;
use raspa_client::engine::client::SimulationClient;
use raspa_client::engine::progress::ProgressReporter;
use tracing::info;

pub async fn run(args: FetchArgs, global: &GlobalArgs) -> Result<()> {
    let config = LoadedConfig::load(global.config.as_deref())?;
    let client_config = config.client_config(global.server.as_deref())?;
    let destination = config.output(args.output.as_deref());
    let handle = JobHandle::new(args.task_id);

    info!("Downloading results of task {} to {:?}", handle, destination);
    let progress_handler = CliProgressHandler::new();
    let callback = progress_handler.get_callback();
    let target = destination.clone();

    let result = blocking(move || {
        let client = SimulationClient::connect(client_config)?;
        let reporter = ProgressReporter::with_callback(callback);
        Ok(client.fetch_results_with_progress(&handle, &target, &reporter)?)
    })
    .await;
    progress_handler.finish();

    let bytes = result?;
    println!(
        "Results downloaded to {} ({} bytes).",
        destination.display(),
        bytes
    );
    Ok(())
}
