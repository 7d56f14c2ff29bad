//! Parser HTTP client.

use async_trait::async_trait;

use crate::domain::ScheduleItem;

use super::error::ParserError;

/// Default parser endpoint (a sidecar on the same host).
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8081/parse";

/// Turns a publication file into schedule records.
#[async_trait]
pub trait ScheduleParser: Send + Sync {
    /// Download and parse the file at `url`.
    async fn parse(&self, url: &str) -> Result<Vec<ScheduleItem>, ParserError>;
}

/// Configuration for the remote parser.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Parser endpoint
    pub base_url: String,
    /// Request timeout in seconds. Parsing downloads the whole file, so this
    /// is generous.
    pub timeout_secs: u64,
}

impl ParserConfig {
    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 120,
        }
    }
}

/// Parser reached over HTTP: `GET <base>?url=<file>` returns a JSON array.
#[derive(Debug, Clone)]
pub struct RemoteParser {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteParser {
    /// Create a new parser client.
    pub fn new(config: ParserConfig) -> Result<Self, ParserError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }
}

#[async_trait]
impl ScheduleParser for RemoteParser {
    async fn parse(&self, url: &str) -> Result<Vec<ScheduleItem>, ParserError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("url", url)])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ParserError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| ParserError::Json {
            message: e.to_string(),
        })
    }
}
