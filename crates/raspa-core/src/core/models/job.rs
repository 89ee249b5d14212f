use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the service assigns to an accepted simulation.
///
/// The handle is opaque to the client: it is only ever echoed back in the status and
/// download paths. It belongs to exactly one submitted input set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobHandle {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for JobHandle {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Lifecycle state reported by the service.
///
/// Only `completed` and `failed` carry meaning for the client. Every other value is kept
/// verbatim in [`JobState::Other`] so that new server states pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobState {
    Queued,
    Running,
    Completed,
    Failed,
    Other(String),
}

impl JobState {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "queued" => Self::Queued,
            "running" => Self::Running,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for JobState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JobState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// One snapshot of a job as returned by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(rename = "status")]
    pub state: JobState,
    /// Recent log lines, oldest first. The service only ever appends to this list.
    #[serde(default)]
    pub log: Vec<String>,
}

impl JobStatus {
    /// Log lines with the surrounding whitespace (usually trailing newlines) removed.
    pub fn log_lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.log.iter().map(|line| line.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_states_are_parsed_and_unknown_states_are_kept_verbatim() {
        assert_eq!(JobState::parse("queued"), JobState::Queued);
        assert_eq!(JobState::parse("running"), JobState::Running);
        assert_eq!(JobState::parse("completed"), JobState::Completed);
        assert_eq!(JobState::parse("failed"), JobState::Failed);

        let other = JobState::parse("post-processing");
        assert_eq!(other, JobState::Other("post-processing".to_string()));
        assert_eq!(other.as_str(), "post-processing");
        assert!(!other.is_terminal());
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(!JobState::Queued.is_terminal());
        assert!(!JobState::Running.is_terminal());
    }

    #[test]
    fn status_body_deserializes_with_and_without_log() {
        let status: JobStatus =
            serde_json::from_str(r#"{"status": "running", "log": ["Cycle 10\n", "  Cycle 20  "]}"#)
                .unwrap();
        assert_eq!(status.state, JobState::Running);
        assert_eq!(
            status.log_lines().collect::<Vec<_>>(),
            vec!["Cycle 10", "Cycle 20"]
        );

        let bare: JobStatus = serde_json::from_str(r#"{"status": "queued"}"#).unwrap();
        assert_eq!(bare.state, JobState::Queued);
        assert!(bare.log.is_empty());
    }

    #[test]
    fn job_handle_is_a_transparent_string() {
        let handle: JobHandle = serde_json::from_str(r#""a1b2c3""#).unwrap();
        assert_eq!(handle, JobHandle::from("a1b2c3"));
        assert_eq!(handle.to_string(), "a1b2c3");
        assert_eq!(serde_json::to_string(&handle).unwrap(), r#""a1b2c3""#);
    }
}
