use std::time::Duration;
use thiserror::Error;

/// Size of the buffer used when streaming the result archive to disk.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

/// Settings fixed for the lifetime of a [`SimulationClient`](super::client::SimulationClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root URL of the simulation service, e.g. `http://host:8000`.
    pub base_url: String,
    /// Upper bound on the bytes read and written per step while downloading results.
    pub chunk_size: usize,
    /// Per-request time limit. `None` means a request may block indefinitely.
    pub request_timeout: Option<Duration>,
}

#[derive(Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    chunk_size: Option<usize>,
    request_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
    pub fn chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = Some(bytes);
        self
    }
    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = self
            .base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingParameter("base_url"))?;

        let chunk_size = self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE);
        if chunk_size == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "chunk_size",
                reason: "must be at least one byte".to_string(),
            });
        }

        if self.request_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::InvalidParameter {
                parameter: "request_timeout",
                reason: "must be positive; leave it unset to disable the limit".to_string(),
            });
        }

        Ok(ClientConfig {
            base_url,
            chunk_size,
            request_timeout: self.request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let config = ClientConfigBuilder::new()
            .base_url("http://localhost:8000")
            .build()
            .unwrap();

        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn builder_requires_a_base_url() {
        let result = ClientConfigBuilder::new().build();
        assert_eq!(result, Err(ConfigError::MissingParameter("base_url")));

        let blank = ClientConfigBuilder::new().base_url("   ").build();
        assert_eq!(blank, Err(ConfigError::MissingParameter("base_url")));
    }

    #[test]
    fn builder_rejects_degenerate_limits() {
        let zero_chunk = ClientConfigBuilder::new()
            .base_url("http://localhost")
            .chunk_size(0)
            .build();
        assert!(matches!(
            zero_chunk,
            Err(ConfigError::InvalidParameter {
                parameter: "chunk_size",
                ..
            })
        ));

        let zero_timeout = ClientConfigBuilder::new()
            .base_url("http://localhost")
            .request_timeout(Some(Duration::ZERO))
            .build();
        assert!(matches!(
            zero_timeout,
            Err(ConfigError::InvalidParameter {
                parameter: "request_timeout",
                ..
            })
        ));
    }

    #[test]
    fn builder_keeps_explicit_settings() {
        let config = ClientConfigBuilder::new()
            .base_url(" https://raspa.example.org ")
            .chunk_size(1024)
            .request_timeout(Some(Duration::from_secs(600)))
            .build()
            .unwrap();

        assert_eq!(config.base_url, "https://raspa.example.org");
        assert_eq!(config.chunk_size, 1024);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(600)));
    }
}
