use std::fmt;

use scrapevision_core::RequestFailure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Timeout,
    Network,
    HttpStatus(u16),
    /// The service returned an `{"error": ...}` body.
    Server(String),
    Malformed,
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Server(message) => write!(f, "server error ({message})"),
            FailureKind::Malformed => write!(f, "malformed response"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}

impl From<ApiError> for RequestFailure {
    fn from(err: ApiError) -> Self {
        let detail = err.to_string();
        match err.kind {
            FailureKind::Timeout | FailureKind::Network => RequestFailure::Transport(detail),
            FailureKind::Server(message) => RequestFailure::Server(message),
            FailureKind::InvalidUrl
            | FailureKind::HttpStatus(_)
            | FailureKind::Malformed
            | FailureKind::TooLarge { .. } => RequestFailure::Malformed(detail),
        }
    }
}
