use super::{Reply, Transport, TransportError, UploadForm};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, trace};

/// [`Transport`] backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Builds a transport rooted at `base_url`.
    ///
    /// `timeout` applies to each whole request. `None` disables the limit entirely, which
    /// also switches off `reqwest`'s built-in 30 second default.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let base_url = validate_base_url(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        debug!("HTTP transport ready for {} (timeout: {:?})", base_url, timeout);
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn into_reply(response: Response) -> Reply {
        let status = response.status().as_u16();
        let content_length = response.content_length();
        trace!("Received HTTP {} (content length: {:?})", status, content_length);
        Reply::new(status, content_length, response)
    }
}

impl Transport for HttpTransport {
    fn post_form(&self, path: &str, upload: UploadForm) -> Result<Reply, TransportError> {
        let mut form = Form::new();
        for (name, value) in upload.fields {
            form = form.text(name, value);
        }
        for file in upload.files {
            let part = Part::reader_with_length(file.file, file.len).file_name(file.file_name);
            form = form.part(file.field, part);
        }

        let url = self.url(path);
        debug!("POST {} (multipart)", url);
        let response = self.client.post(&url).multipart(form).send()?;
        Ok(Self::into_reply(response))
    }

    fn get(&self, path: &str) -> Result<Reply, TransportError> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self.client.get(&url).send()?;
        Ok(Self::into_reply(response))
    }
}

/// Checks that `raw` is an absolute `http`/`https` URL and returns it without trailing
/// slashes, ready to have endpoint paths appended.
pub fn validate_base_url(raw: &str) -> Result<String, TransportError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|e| TransportError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(TransportError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(trimmed.to_string())
}
