use super::config::ClientConfig;
use super::error::{ClientError, Operation, ServerPayload};
use super::progress::{Progress, ProgressReporter};
use crate::core::models::inputs::SimulationInputs;
use crate::core::models::job::{JobHandle, JobStatus};
use crate::core::transport::http::HttpTransport;
use crate::core::transport::{Reply, Transport, TransportError, UploadFile, UploadForm};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

const SUBMIT_PATH: &str = "/run_simulation";
const STATUS_PATH: &str = "/task_status";
const DOWNLOAD_PATH: &str = "/download_results";
const HTTP_OK: u16 = 200;
const HTTP_ACCEPTED: u16 = 202;

pub const DEFAULT_NPROC: u32 = 2;

#[derive(Deserialize)]
struct SubmitReply {
    task_id: String,
}

/// Client for one simulation service.
///
/// The client holds no job state: every call takes the [`JobHandle`] it acts on, and every
/// status call goes to the server.
pub struct SimulationClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl SimulationClient {
    /// Creates a client that talks HTTP to `config.base_url`.
    pub fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config.base_url, config.request_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Uploads the five input files and asks the service to start a simulation with
    /// `nproc` processes.
    ///
    /// All files are opened before anything is sent; a file that cannot be opened aborts
    /// the submission without contacting the service. The open handles live inside the
    /// upload form and are closed once the request has completed or failed.
    pub fn submit(&self, inputs: &SimulationInputs, nproc: u32) -> Result<JobHandle, ClientError> {
        let result = self.try_submit(inputs, nproc);
        match &result {
            Ok(handle) => info!("Simulation started. Task ID: {}", handle),
            Err(e) => error!("Failed to start simulation: {}", e),
        }
        result
    }

    fn try_submit(&self, inputs: &SimulationInputs, nproc: u32) -> Result<JobHandle, ClientError> {
        let mut form = UploadForm::new().text("nproc", nproc.to_string());
        for (kind, path) in inputs.iter() {
            let input_error = |source| ClientError::InputFile {
                kind,
                path: path.to_path_buf(),
                source,
            };
            let file = File::open(path).map_err(input_error)?;
            let len = file.metadata().map_err(input_error)?.len();
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| kind.field_name().to_string());
            debug!("Attaching {} ({} bytes) as '{}'", path.display(), len, kind.field_name());
            form = form.file(UploadFile {
                field: kind.field_name(),
                file_name,
                file,
                len,
            });
        }

        let reply = self.transport.post_form(SUBMIT_PATH, form)?;
        let body = expect_status(reply, Operation::Submit, HTTP_ACCEPTED)?;
        let accepted: SubmitReply =
            serde_json::from_slice(&body).map_err(|source| ClientError::MalformedResponse {
                operation: Operation::Submit,
                source,
            })?;
        Ok(JobHandle::new(accepted.task_id))
    }

    /// Fetches the current state and log snapshot of a job. Never cached.
    pub fn get_status(&self, handle: &JobHandle) -> Result<JobStatus, ClientError> {
        let result = self.try_get_status(handle);
        match &result {
            Ok(status) => {
                info!("Task {} status: {}", handle, status.state);
                for line in status.log_lines() {
                    debug!("[{}] {}", handle, line);
                }
            }
            Err(e) => error!("Failed to query status of task {}: {}", handle, e),
        }
        result
    }

    fn try_get_status(&self, handle: &JobHandle) -> Result<JobStatus, ClientError> {
        let reply = self.transport.get(&task_path(STATUS_PATH, handle)?)?;
        let body = expect_status(reply, Operation::Status, HTTP_OK)?;
        serde_json::from_slice(&body).map_err(|source| ClientError::MalformedResponse {
            operation: Operation::Status,
            source,
        })
    }

    /// Streams the result archive of a completed job into `destination`, replacing any
    /// existing file. Returns the number of bytes written.
    pub fn fetch_results(&self, handle: &JobHandle, destination: &Path) -> Result<u64, ClientError> {
        self.fetch_results_with_progress(handle, destination, &ProgressReporter::new())
    }

    pub fn fetch_results_with_progress(
        &self,
        handle: &JobHandle,
        destination: &Path,
        reporter: &ProgressReporter,
    ) -> Result<u64, ClientError> {
        let result = self.try_fetch_results(handle, destination, reporter);
        match &result {
            Ok(bytes) => info!("Results downloaded: {} ({} bytes)", destination.display(), bytes),
            Err(e) => error!("Failed to download results of task {}: {}", handle, e),
        }
        result
    }

    fn try_fetch_results(
        &self,
        handle: &JobHandle,
        destination: &Path,
        reporter: &ProgressReporter,
    ) -> Result<u64, ClientError> {
        let mut reply = self.transport.get(&task_path(DOWNLOAD_PATH, handle)?)?;
        if reply.status() != HTTP_OK {
            return Err(rejected(reply, Operation::Download));
        }

        let output_error = |source| ClientError::Output {
            path: destination.to_path_buf(),
            source,
        };
        let parent = match destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(output_error)?;
                parent
            }
            None => Path::new("."),
        };
        // Staged next to the destination and moved into place once complete. An early
        // return drops `staging`, which deletes the partial file.
        let mut staging = NamedTempFile::new_in(parent).map_err(output_error)?;

        reporter.report(Progress::DownloadStarted {
            total_bytes: reply.content_length(),
        });

        let mut buffer = vec![0u8; self.config.chunk_size];
        let mut written: u64 = 0;
        loop {
            let n = reply
                .body_mut()
                .read(&mut buffer)
                .map_err(TransportError::from)?;
            if n == 0 {
                break;
            }
            staging.write_all(&buffer[..n]).map_err(output_error)?;
            written += n as u64;
            reporter.report(Progress::DownloadAdvanced {
                downloaded: written,
            });
        }
        staging.flush().map_err(output_error)?;
        staging
            .persist(destination)
            .map_err(|e| output_error(e.error))?;
        debug!("Moved finished download into {}", destination.display());

        reporter.report(Progress::DownloadFinished {
            path: destination.to_path_buf(),
            bytes: written,
        });
        Ok(written)
    }
}

/// `{prefix}/{task id}` with the id percent-encoded as a single path segment.
fn task_path(prefix: &str, handle: &JobHandle) -> Result<String, ClientError> {
    match handle.as_str() {
        "" | "." | ".." => Err(ClientError::InvalidHandle(handle.clone())),
        id => Ok(format!("{}/{}", prefix, urlencoding::encode(id))),
    }
}

/// Returns the body of `reply` if it carries `expected`, or the server's rejection.
fn expect_status(reply: Reply, operation: Operation, expected: u16) -> Result<Vec<u8>, ClientError> {
    if reply.status() != expected {
        return Err(rejected(reply, operation));
    }
    Ok(reply.into_bytes().map_err(TransportError::from)?)
}

fn rejected(reply: Reply, operation: Operation) -> ClientError {
    let status = reply.status();
    let payload = match reply.into_bytes() {
        Ok(body) => ServerPayload::from_bytes(&body),
        Err(e) => ServerPayload(serde_json::Value::String(format!(
            "<unreadable error body: {}>",
            e
        ))),
    };
    ClientError::Server {
        operation,
        status,
        payload,
    }
}
