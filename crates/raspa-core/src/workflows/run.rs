use crate::core::models::inputs::SimulationInputs;
use crate::core::models::job::{JobHandle, JobState};
use crate::engine::cancel::Pause;
use crate::engine::client::{DEFAULT_NPROC, SimulationClient};
use crate::engine::error::ClientError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, instrument, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_RESULTS_PATH: &str = "results.zip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub nproc: u32,
    pub poll_interval: Duration,
    pub destination: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            nproc: DEFAULT_NPROC,
            poll_interval: DEFAULT_POLL_INTERVAL,
            destination: PathBuf::from(DEFAULT_RESULTS_PATH),
        }
    }
}

/// How a submit-poll-download run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The job completed and its archive was written to `path`.
    Completed {
        handle: JobHandle,
        path: PathBuf,
        bytes: u64,
    },
    /// The service reported the job as failed. `log` is the last log snapshot.
    Failed { handle: JobHandle, log: Vec<String> },
    SubmitFailed(ClientError),
    StatusFailed {
        handle: JobHandle,
        error: ClientError,
    },
    DownloadFailed {
        handle: JobHandle,
        error: ClientError,
    },
    /// The wait was interrupted. `handle` is `None` if nothing had been submitted yet.
    Cancelled { handle: Option<JobHandle> },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }

    pub fn handle(&self) -> Option<&JobHandle> {
        match self {
            RunOutcome::Completed { handle, .. }
            | RunOutcome::Failed { handle, .. }
            | RunOutcome::StatusFailed { handle, .. }
            | RunOutcome::DownloadFailed { handle, .. } => Some(handle),
            RunOutcome::Cancelled { handle } => handle.as_ref(),
            RunOutcome::SubmitFailed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            RunOutcome::SubmitFailed(error)
            | RunOutcome::StatusFailed { error, .. }
            | RunOutcome::DownloadFailed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Path of the downloaded archive, present only when the run completed.
    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            RunOutcome::Completed { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Submits a simulation, polls until it reaches a terminal state and downloads the
/// results once it has completed.
///
/// Between two status checks the calling thread waits `options.poll_interval` on
/// `pause`. There is no limit on the number of polls; the loop only ends on a terminal
/// state, a failed request, or cancellation through `pause`.
#[instrument(skip_all, name = "run_and_wait", fields(nproc = options.nproc))]
pub fn run_and_wait(
    client: &SimulationClient,
    inputs: &SimulationInputs,
    options: &RunOptions,
    pause: &dyn Pause,
    reporter: &ProgressReporter,
) -> RunOutcome {
    if pause.is_cancelled() {
        return RunOutcome::Cancelled { handle: None };
    }

    let handle = match client.submit(inputs, options.nproc) {
        Ok(handle) => handle,
        Err(error) => return RunOutcome::SubmitFailed(error),
    };
    reporter.report(Progress::Submitted {
        handle: handle.clone(),
    });

    loop {
        if pause.is_cancelled() {
            warn!("Stopped waiting for task {}; the job keeps running on the server.", handle);
            return RunOutcome::Cancelled {
                handle: Some(handle),
            };
        }

        let status = match client.get_status(&handle) {
            Ok(status) => status,
            Err(error) => return RunOutcome::StatusFailed { handle, error },
        };
        reporter.report(Progress::StatusPolled {
            status: status.clone(),
        });

        match status.state {
            JobState::Completed => {
                return match client.fetch_results_with_progress(
                    &handle,
                    &options.destination,
                    reporter,
                ) {
                    Ok(bytes) => RunOutcome::Completed {
                        handle,
                        path: options.destination.clone(),
                        bytes,
                    },
                    Err(error) => RunOutcome::DownloadFailed { handle, error },
                };
            }
            JobState::Failed => {
                warn!("Simulation failed (task {}).", handle);
                return RunOutcome::Failed {
                    handle,
                    log: status.log,
                };
            }
            _ => {}
        }

        info!(
            "Waiting {} seconds before checking again...",
            options.poll_interval.as_secs_f64()
        );
        reporter.report(Progress::Waiting {
            interval: options.poll_interval,
        });
        if !pause.pause(options.poll_interval) {
            warn!("Stopped waiting for task {}; the job keeps running on the server.", handle);
            return RunOutcome::Cancelled {
                handle: Some(handle),
            };
        }
    }
}
