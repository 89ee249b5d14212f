//! # Transport Module
//!
//! Separates what the client asks the service for from how the bytes travel.
//!
//! - [`Transport`] - the two request shapes the service needs: a multipart form upload and
//!   a plain `GET`, both answering with a status code and a streamed body
//! - [`http::HttpTransport`] - the production implementation on top of the blocking
//!   `reqwest` client
//!
//! Status codes are never interpreted here. A [`Reply`] is handed back for every response
//! the server produced, successful or not; only failures to exchange a request at all are
//! reported as [`TransportError`].

pub mod http;

#[cfg(test)]
pub(crate) mod mock;

use std::fs::File;
use std::io::{self, Read};

/// Errors raised when a request could not be exchanged with the service.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("I/O error while talking to the service: {0}")]
    Io(#[from] io::Error),
}

/// A local file attached to an upload form.
///
/// The form owns the open handle; it is closed as soon as the form is dropped, which
/// happens when the request has been sent or has failed.
#[derive(Debug)]
pub struct UploadFile {
    pub field: &'static str,
    pub file_name: String,
    pub file: File,
    pub len: u64,
}

/// A multipart form: file parts plus plain text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: Vec<UploadFile>,
    pub fields: Vec<(&'static str, String)>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, file: UploadFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((name, value.into()));
        self
    }
}

/// A response from the service with its body still unread.
pub struct Reply {
    status: u16,
    content_length: Option<u64>,
    body: Box<dyn Read + Send>,
}

impl Reply {
    pub fn new(status: u16, content_length: Option<u64>, body: impl Read + Send + 'static) -> Self {
        Self {
            status,
            content_length,
            body: Box::new(body),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn body_mut(&mut self) -> &mut (dyn Read + Send) {
        self.body.as_mut()
    }

    /// Drains the body into memory. Only meant for the small JSON documents the service
    /// sends; archives are streamed through [`Reply::body_mut`] instead.
    pub fn into_bytes(mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.body.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl std::fmt::Debug for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reply")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// The request shapes used to talk to the simulation service.
///
/// Paths are relative to the service root and start with `/`.
pub trait Transport: Send + Sync {
    /// Sends a multipart form with `POST`.
    fn post_form(&self, path: &str, form: UploadForm) -> Result<Reply, TransportError>;

    /// Sends a `GET` and returns as soon as the response head has arrived.
    fn get(&self, path: &str) -> Result<Reply, TransportError>;
}
