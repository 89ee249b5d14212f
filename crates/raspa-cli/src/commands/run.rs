use super::blocking;
use crate::cli::{GlobalArgs, RunArgs};
use crate::config::LoadedConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use raspa_client::engine::cancel::CancellationToken;
use raspa_client::engine::client::SimulationClient;
use raspa_client::engine::progress::ProgressReporter;
use raspa_client::workflows::run::{RunOutcome, run_and_wait};
use tracing::{info, warn};

const INTERRUPTED_EXIT_CODE: i32 = 130;

pub async fn run(args: RunArgs, global: &GlobalArgs) -> Result<()> {
    let config = LoadedConfig::load(global.config.as_deref())?;
    let client_config = config.client_config(global.server.as_deref())?;
    let inputs = config.inputs(&args.inputs)?;
    let options = config.run_options(args.nproc, args.poll_interval, args.output.as_deref())?;

    let token = CancellationToken::new();
    let interrupt_watcher = spawn_interrupt_watcher(token.clone());

    let progress_handler = CliProgressHandler::new();
    let callback = progress_handler.get_callback();

    println!("Submitting simulation to {}...", client_config.base_url);
    info!(
        "Running simulation with {} process(es), polling every {}s.",
        options.nproc,
        options.poll_interval.as_secs()
    );

    let result = blocking(move || {
        let client = SimulationClient::connect(client_config)?;
        let reporter = ProgressReporter::with_callback(callback);
        Ok(run_and_wait(&client, &inputs, &options, &token, &reporter))
    })
    .await;
    interrupt_watcher.abort();
    progress_handler.finish();

    report(result?)
}

/// Cancels `token` on the first Ctrl-C. A second Ctrl-C exits immediately, since an
/// in-flight request is only abandoned once it returns.
fn spawn_interrupt_watcher(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("Could not listen for Ctrl-C; the run can only end on its own.");
            return;
        }
        warn!("Interrupt received. Stopping after the current request (Ctrl-C again to quit).");
        token.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Interrupted.");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    })
}

fn report(outcome: RunOutcome) -> Result<()> {
    match outcome {
        RunOutcome::Completed {
            handle,
            path,
            bytes,
        } => {
            println!(
                "✓ Task {} completed. Results ({} bytes) written to: {}",
                handle,
                bytes,
                path.display()
            );
            Ok(())
        }
        RunOutcome::Failed { handle, log } => {
            if !log.is_empty() {
                eprintln!("Last log lines of task {}:", handle);
                for line in &log {
                    eprintln!("  {}", line);
                }
            }
            Err(CliError::Run(format!(
                "Simulation {} failed on the server.",
                handle
            )))
        }
        RunOutcome::SubmitFailed(error) => Err(error.into()),
        RunOutcome::StatusFailed { handle, error } => Err(CliError::Run(format!(
            "Could not read the status of task {}: {}. Check it later with 'raspa status {}'.",
            handle, error, handle
        ))),
        RunOutcome::DownloadFailed { handle, error } => Err(CliError::Run(format!(
            "Task {} completed but its results could not be downloaded: {}. Retry with 'raspa fetch {}'.",
            handle, error, handle
        ))),
        RunOutcome::Cancelled { handle: Some(handle) } => Err(CliError::Run(format!(
            "Cancelled while waiting for task {}. The simulation keeps running on the server; check it with 'raspa status {}'.",
            handle, handle
        ))),
        RunOutcome::Cancelled { handle: None } => Err(CliError::Run(
            "Cancelled before the simulation was submitted.".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raspa_client::core::models::job::JobHandle;
    use std::path::PathBuf;

    #[test]
    fn completed_run_is_a_success() {
        let outcome = RunOutcome::Completed {
            handle: JobHandle::from("abc"),
            path: PathBuf::from("results.zip"),
            bytes: 12,
        };
        assert!(report(outcome).is_ok());
    }

    #[test]
    fn failed_run_names_the_task() {
        let outcome = RunOutcome::Failed {
            handle: JobHandle::from("abc"),
            log: vec!["Error: framework not found".to_string()],
        };
        let err = report(outcome).unwrap_err();
        assert!(matches!(err, CliError::Run(msg) if msg.contains("abc")));
    }

    #[test]
    fn cancelled_run_points_to_the_status_command() {
        let outcome = RunOutcome::Cancelled {
            handle: Some(JobHandle::from("abc")),
        };
        let err = report(outcome).unwrap_err();
        assert!(matches!(err, CliError::Run(msg) if msg.contains("raspa status abc")));
    }
}
