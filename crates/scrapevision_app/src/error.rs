use std::io;
use std::path::PathBuf;

use scrapevision_engine::{ApiError, ExportError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid log level {0:?}")]
    LogLevel(String),
    #[error("invalid {kind} filter {value:?}; expected \"all\" or one of: {expected}")]
    InvalidFilter {
        kind: &'static str,
        value: String,
        expected: String,
    },
    #[error("could not set up the job API client: {0}")]
    Client(#[from] ApiError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}
