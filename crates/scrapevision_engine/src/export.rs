use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use scrapevision_core::{to_csv, ResultRecord, EXPORT_FILENAME, EXPORT_MIME_TYPE};
use scrapevision_logging::sv_info;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub mime_type: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("there are no results to export")]
    NoResults,
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Write `records` as `results.csv` inside `dir`, replacing any previous export.
pub fn export_csv(dir: &Path, records: &[ResultRecord]) -> Result<ExportSummary, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoResults);
    }
    let path = write_atomically(dir, EXPORT_FILENAME, to_csv(records).as_bytes())?;
    sv_info!("Exported {} records to {:?}", records.len(), path);
    Ok(ExportSummary {
        path,
        rows: records.len(),
        mime_type: EXPORT_MIME_TYPE,
    })
}

/// Ensure the output directory exists; create it if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), ExportError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(ExportError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Write to a temp file in `dir`, then rename over `{dir}/{filename}`, so a
/// reader never sees a half-written export.
fn write_atomically(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf, ExportError> {
    ensure_output_dir(dir)?;

    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(&target).map_err(|e| ExportError::Io(e.error))?;
    Ok(target)
}
