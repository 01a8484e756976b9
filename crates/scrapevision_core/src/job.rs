use std::fmt;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::record::ResultRecord;

/// Counter bumped on every submit, cancel and reset. Every request carries the
/// generation it was issued for; replies from an older generation are stale.
pub type Generation = u64;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error";
pub const SUBMIT_SERVER_ERROR_MESSAGE: &str = "Server error occurred";
pub const STATUS_FETCH_ERROR_MESSAGE: &str = "Error fetching job status.";
pub const JOB_FAILED_MESSAGE: &str = "Crawl job failed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
    CanceledLocally,
}

impl JobState {
    pub fn is_active(self) -> bool {
        matches!(self, JobState::Submitting | JobState::Polling)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::CanceledLocally
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            JobState::Idle => "Idle",
            JobState::Submitting => "Submitting",
            JobState::Polling => "Polling",
            JobState::Completed => "Completed",
            JobState::Failed => "Failed",
            JobState::CanceledLocally => "Canceled",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a job ended in `Failed`. All variants are terminal and surface as a
/// single human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    #[error("{0}")]
    Submission(String),
    #[error("{0}")]
    Polling(String),
    #[error("{0}")]
    JobFailed(String),
}

impl JobError {
    pub fn message(&self) -> &str {
        match self {
            JobError::Submission(message)
            | JobError::Polling(message)
            | JobError::JobFailed(message) => message,
        }
    }
}

/// Classified outcome of a request that produced no usable reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// No response: connect failure, timeout, broken body.
    Transport(String),
    /// The service answered with a structured `{"error": ...}` body.
    Server(String),
    /// A response arrived but could not be interpreted.
    Malformed(String),
}

impl RequestFailure {
    pub fn submission_message(&self) -> String {
        match self {
            RequestFailure::Transport(_) => NETWORK_ERROR_MESSAGE.to_string(),
            RequestFailure::Server(message) => message.clone(),
            RequestFailure::Malformed(_) => SUBMIT_SERVER_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn polling_message(&self) -> String {
        match self {
            RequestFailure::Server(message) => message.clone(),
            RequestFailure::Transport(_) | RequestFailure::Malformed(_) => {
                STATUS_FETCH_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// Underlying detail, for logs only.
    pub fn detail(&self) -> &str {
        match self {
            RequestFailure::Transport(detail)
            | RequestFailure::Server(detail)
            | RequestFailure::Malformed(detail) => detail,
        }
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFailure::Transport(detail) => write!(f, "transport failure: {detail}"),
            RequestFailure::Server(message) => write!(f, "server error: {message}"),
            RequestFailure::Malformed(detail) => write!(f, "malformed response: {detail}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlMethod {
    #[default]
    Bfs,
    Dfs,
}

impl CrawlMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            CrawlMethod::Bfs => "bfs",
            CrawlMethod::Dfs => "dfs",
        }
    }
}

/// Job parameters, forwarded verbatim next to `urls` in the submit body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobParams(Map<String, Value>);

impl JobParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crawl from the start URL with the given traversal and depth.
    pub fn crawl(method: CrawlMethod, depth: u32) -> Self {
        Self::new()
            .with("method", method.as_str())
            .with("depth", depth)
    }

    /// Analyse at most `limit` pages.
    pub fn limit(limit: u32) -> Self {
        Self::new().with("limit", limit)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for JobParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub url: String,
    pub params: JobParams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    Pending,
    Completed,
    Failed,
    /// Anything else the service reports; treated like `Pending`.
    Other(String),
}

impl RemoteStatus {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("pending") {
            RemoteStatus::Pending
        } else if trimmed.eq_ignore_ascii_case("completed") {
            RemoteStatus::Completed
        } else if trimmed.eq_ignore_ascii_case("failed") {
            RemoteStatus::Failed
        } else {
            RemoteStatus::Other(trimmed.to_string())
        }
    }
}

/// One status poll reply, already normalized into records.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub status: RemoteStatus,
    pub results: Vec<ResultRecord>,
    pub error: Option<String>,
}

impl StatusReport {
    pub fn pending(results: Vec<ResultRecord>) -> Self {
        Self {
            status: RemoteStatus::Pending,
            results,
            error: None,
        }
    }

    pub fn completed(results: Vec<ResultRecord>) -> Self {
        Self {
            status: RemoteStatus::Completed,
            results,
            error: None,
        }
    }

    pub fn errored(message: impl Into<String>) -> Self {
        Self {
            status: RemoteStatus::Pending,
            results: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// Polling cadence and budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Status checks allowed per job; `None` polls until a terminal status.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: Some(900),
        }
    }
}
