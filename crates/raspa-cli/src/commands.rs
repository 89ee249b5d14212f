pub mod config;
pub mod fetch;
pub mod run;
pub mod status;
pub mod submit;

use crate::error::{CliError, Result};

/// Runs blocking client work on the blocking thread pool.
///
/// The HTTP client blocks the calling thread, so it must be created, used and dropped
/// inside `f`, never on a runtime worker.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CliError::Other(anyhow::anyhow!("Background task failed: {}", e)))?
}
