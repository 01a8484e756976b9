use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use scrapevision_core::PollPolicy;
use scrapevision_engine::{ClientSettings, DEFAULT_API_BASE_URL};
use scrapevision_logging::{sv_info, LogDestination};
use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_CONFIG_FILE: &str = "./scrapevision.ron";

/// Settings read from `scrapevision.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: Option<u32>,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub max_response_bytes: u64,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        let policy = PollPolicy::default();
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poll_interval_ms: millis(policy.interval),
            max_poll_attempts: policy.max_attempts,
            request_timeout_ms: millis(client.request_timeout),
            connect_timeout_ms: millis(client.connect_timeout),
            max_response_bytes: client.max_response_bytes,
            log_destination: LogDestination::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] when none is given.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => return Err(AppError::ConfigRead { path, source }),
        };
        let config = ron::from_str(&content).map_err(|source| AppError::ConfigParse {
            path: path.clone(),
            source,
        })?;
        sv_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, AppError> {
        LevelFilter::from_str(self.log_level.trim())
            .map_err(|_| AppError::LogLevel(self.log_level.clone()))
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api_base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_response_bytes: self.max_response_bytes,
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.max_poll_attempts,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = AppConfig::load(Some(&dir.path().join("absent.ron"))).expect("load");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base_url, "https://143.198.191.190");
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(config.max_poll_attempts, Some(900));
        assert_eq!(config.max_response_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("scrapevision.ron");
        fs::write(
            &path,
            r#"(api_base_url: "http://localhost:5000", max_poll_attempts: None, log_destination: Both)"#,
        )
        .expect("write");

        let config = AppConfig::load(Some(&path)).expect("load");
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.max_poll_attempts, None);
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(config.poll_policy().max_attempts, None);
        assert_eq!(
            config.client_settings().base_url,
            "http://localhost:5000".to_string()
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("scrapevision.ron");
        fs::write(&path, "(poll_interval_ms: \"soon\")").expect("write");

        assert!(matches!(
            AppConfig::load(Some(&path)),
            Err(AppError::ConfigParse { .. })
        ));
    }

    #[test]
    fn log_level_parses_case_insensitively() {
        let mut config = AppConfig {
            log_level: "Debug".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.level_filter().expect("level"), LevelFilter::Debug);

        config.log_level = "chatty".to_string();
        assert!(matches!(config.level_filter(), Err(AppError::LogLevel(_))));
    }
}
