use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use scrapevision_core::{RemoteStatus, ResultRecord, StatusReport, SubmitRequest};
use scrapevision_logging::sv_debug;
use serde::Deserialize;
use serde_json::Value;

use crate::{ApiError, FailureKind};

pub const DEFAULT_API_BASE_URL: &str = "https://143.198.191.190";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Deadline for one request, including reading the body.
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_response_bytes: 16 * 1024 * 1024,
        }
    }
}

/// The remote analysis service.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    /// Create a job and return its id.
    async fn submit(&self, request: &SubmitRequest) -> Result<String, ApiError>;

    async fn status(&self, job_id: &str) -> Result<StatusReport, ApiError>;

    async fn cancel(&self, job_id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    job_id: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    results: Option<Vec<Value>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestJobApi {
    settings: ClientSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestJobApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Read the whole body, refusing anything over the configured size.
    async fn read_body(&self, response: reqwest::Response) -> Result<(StatusCode, Vec<u8>), ApiError> {
        let status = response.status();
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok((status, bytes))
    }
}

#[async_trait::async_trait]
impl JobApi for ReqwestJobApi {
    async fn submit(&self, request: &SubmitRequest) -> Result<String, ApiError> {
        let mut body = request.params.as_map().clone();
        body.insert("urls".to_string(), Value::from(vec![request.url.clone()]));
        let payload = serde_json::to_vec(&Value::Object(body))
            .map_err(|err| ApiError::new(FailureKind::Malformed, err.to_string()))?;

        let url = self.endpoint(&["analyse"]);
        sv_debug!("POST {} ({} bytes)", url, payload.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let (status, bytes) = self.read_body(response).await?;
        if !status.is_success() {
            return Err(error_from_body(status, &bytes));
        }
        let parsed: SubmitResponse = parse_json(&bytes)?;
        if let Some(message) = parsed.error.filter(|message| !message.is_empty()) {
            return Err(ApiError::new(FailureKind::Server(message.clone()), message));
        }
        match parsed.job_id {
            Some(Value::String(id)) if !id.is_empty() => Ok(id),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => Err(ApiError::new(
                FailureKind::Malformed,
                "response has no job_id",
            )),
        }
    }

    async fn status(&self, job_id: &str) -> Result<StatusReport, ApiError> {
        let url = self.endpoint(&["status", job_id]);
        sv_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let (status, bytes) = self.read_body(response).await?;
        if !status.is_success() {
            return Err(error_from_body(status, &bytes));
        }
        let parsed: StatusResponse = parse_json(&bytes)?;
        Ok(StatusReport {
            status: RemoteStatus::parse(parsed.status.as_deref().unwrap_or_default()),
            results: parsed
                .results
                .unwrap_or_default()
                .iter()
                .map(record_from_value)
                .collect(),
            error: parsed.error,
        })
    }

    async fn cancel(&self, job_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["cancel", job_id]);
        sv_debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let (status, bytes) = self.read_body(response).await?;
        if !status.is_success() {
            return Err(error_from_body(status, &bytes));
        }
        Ok(())
    }
}

/// Build a record from one wire object, tolerating missing or mistyped fields.
fn record_from_value(value: &Value) -> ResultRecord {
    let text = |key: &str| match value.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => Some(other.to_string()),
    };
    let score = match value.get("sentiment_score") {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    ResultRecord::from_raw(
        text("url").unwrap_or_default(),
        &text("star_label").unwrap_or_default(),
        &text("sentiment_label").unwrap_or_default(),
        score,
        text("summary"),
    )
}

fn parse_json<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes)
        .map_err(|err| ApiError::new(FailureKind::Malformed, err.to_string()))
}

fn error_from_body(status: StatusCode, bytes: &[u8]) -> ApiError {
    match serde_json::from_slice::<ErrorBody>(bytes) {
        Ok(ErrorBody {
            error: Some(message),
        }) if !message.is_empty() => ApiError::new(FailureKind::Server(message.clone()), message),
        _ => ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string()),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
