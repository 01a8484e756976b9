//! ScrapeVision engine: HTTP job API, controller runtime, and file export.
mod client;
mod engine;
mod export;
mod types;

pub use client::{ClientSettings, JobApi, ReqwestJobApi, DEFAULT_API_BASE_URL};
pub use engine::Controller;
pub use export::{ensure_output_dir, export_csv, ExportError, ExportSummary};
pub use types::{ApiError, FailureKind};
