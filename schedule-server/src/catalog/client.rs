//! Catalog HTTP client.

use async_trait::async_trait;

use super::error::CatalogError;
use super::types::CatalogResponse;

/// Default media-links endpoint.
const DEFAULT_BASE_URL: &str = "https://b.jw-cdn.org/apis/pub-media/GETPUBMEDIALINKS";

/// Resolves a publication issue to a downloadable file.
#[async_trait]
pub trait PublicationCatalog: Send + Sync {
    /// URL of the preferred file for `(lang, pub_code, issue)`.
    async fn resolve_publication_url(
        &self,
        lang: &str,
        pub_code: &str,
        issue: &str,
    ) -> Result<String, CatalogError>;
}

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Media-links endpoint
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl CatalogConfig {
    /// Set a custom base URL (for testing).
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

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// HTTP client for the media-links catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog client.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch the full media-links document for an issue.
    pub async fn fetch_links(
        &self,
        lang: &str,
        pub_code: &str,
        issue: &str,
    ) -> Result<CatalogResponse, CatalogError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("langwritten", lang),
                ("pub", pub_code),
                ("output", "json"),
                ("issue", issue),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            return Err(CatalogError::NotFound {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| CatalogError::Json {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl PublicationCatalog for CatalogClient {
    async fn resolve_publication_url(
        &self,
        lang: &str,
        pub_code: &str,
        issue: &str,
    ) -> Result<String, CatalogError> {
        let links = self.fetch_links(lang, pub_code, issue).await?;

        links
            .preferred_url(lang)
            .map(str::to_string)
            .ok_or(CatalogError::NoDownloadableFile)
    }
}
