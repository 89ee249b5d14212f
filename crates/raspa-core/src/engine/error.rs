use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::inputs::InputKind;
use crate::core::models::job::JobHandle;
use crate::core::transport::TransportError;

/// The three calls the service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Submit,
    Status,
    Download,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Submit => "submit",
            Operation::Status => "status",
            Operation::Download => "download",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error body returned by the service alongside a non-success status.
///
/// The service answers with JSON (typically `{"detail": "..."}`); bodies that are not
/// valid JSON are kept as a plain string value.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerPayload(pub serde_json::Value);

impl ServerPayload {
    pub fn from_bytes(body: &[u8]) -> Self {
        match serde_json::from_slice(body) {
            Ok(value) => Self(value),
            Err(_) => Self(serde_json::Value::String(
                String::from_utf8_lossy(body).trim().to_string(),
            )),
        }
    }

    /// The `detail` message when the payload has one.
    pub fn detail(&self) -> Option<&str> {
        self.0.get("detail").and_then(|d| d.as_str())
    }
}

impl fmt::Display for ServerPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.0, self.detail()) {
            (_, Some(detail)) => f.write_str(detail),
            (serde_json::Value::String(text), None) if text.is_empty() => f.write_str("<empty body>"),
            (serde_json::Value::String(text), None) => f.write_str(text),
            (value, None) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid client configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("The {operation} request was rejected with HTTP {status}: {payload}")]
    Server {
        operation: Operation,
        status: u16,
        payload: ServerPayload,
    },

    #[error("Task ID '{0}' cannot be used in a request path")]
    InvalidHandle(JobHandle),

    #[error("Malformed {operation} response: {source}")]
    MalformedResponse {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot read {kind} file '{path}': {source}", path = path.display())]
    InputFile {
        kind: InputKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write results to '{path}': {source}", path = path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// HTTP status of a rejected request, if the service answered at all.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}
