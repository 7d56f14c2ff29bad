//! Request orchestration.
//!
//! Resolve the issue, resolve the file URL, serve from cache or parse, then
//! filter to the requested week. Each request runs these steps in order; no
//! step is retried and nothing partial is ever returned.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::cache::{Payload, ScheduleCache, fingerprint_of};
use crate::catalog::{CatalogError, PublicationCatalog};
use crate::clock::Clock;
use crate::domain::{DomainError, ScheduleItem, filter_by_date, parse_calendar_date, resolve_issue};
use crate::parser::{ParserError, ScheduleParser};

/// Fallbacks used when a request names only one of language and publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDefaults {
    pub lang: String,
    pub pub_code: String,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            lang: "E".to_string(),
            pub_code: "mwb".to_string(),
        }
    }
}

/// What the caller asked for. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct ScheduleQuery {
    pub url: Option<String>,
    pub lang: Option<String>,
    pub pub_code: Option<String>,
    pub issue: Option<String>,
    pub date: Option<String>,
}

/// Result of a successful request.
#[derive(Debug, Clone)]
pub struct ScheduleResult {
    /// Whether the payload came from the cache.
    pub cached: bool,
    /// Schedule items, filtered when a date was supplied.
    pub data: Vec<ScheduleItem>,
    /// Age of the cache entry in seconds, on a hit.
    pub cache_age: Option<u64>,
}

/// Request-level failures.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Neither a file URL nor a publication was given
    #[error("Missing required parameters: url or (lang and pub)")]
    MissingParameters,

    /// `date` could not be read as a calendar date
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Issue could not be computed
    #[error(transparent)]
    Issue(#[from] DomainError),

    /// Catalog lookup failed
    #[error(transparent)]
    PublicationNotFound(#[from] CatalogError),

    /// Parser failed
    #[error(transparent)]
    ParseFailure(#[from] ParserError),
}

/// Serves schedules for publication references.
pub struct ScheduleService {
    catalog: Arc<dyn PublicationCatalog>,
    parser: Arc<dyn ScheduleParser>,
    cache: Arc<ScheduleCache>,
    clock: Arc<dyn Clock>,
    defaults: RequestDefaults,
}

impl ScheduleService {
    /// Create a service from its collaborators.
    pub fn new(
        catalog: Arc<dyn PublicationCatalog>,
        parser: Arc<dyn ScheduleParser>,
        cache: Arc<ScheduleCache>,
        clock: Arc<dyn Clock>,
        defaults: RequestDefaults,
    ) -> Self {
        Self {
            catalog,
            parser,
            cache,
            clock,
            defaults,
        }
    }

    /// Handle one request.
    pub async fn fetch_schedule(
        &self,
        query: &ScheduleQuery,
    ) -> Result<ScheduleResult, ServiceError> {
        let target_date = non_empty(&query.date)
            .map(|raw| {
                parse_calendar_date(raw).ok_or_else(|| ServiceError::InvalidDate(raw.to_string()))
            })
            .transpose()?;

        let file_url = match non_empty(&query.url) {
            Some(url) => url.to_string(),
            None => self.resolve_file_url(query, target_date).await?,
        };

        let (payload, cache_age) = self.load(&file_url).await?;

        let data = match target_date {
            Some(date) => filter_by_date(&payload, date),
            None => payload.to_vec(),
        };

        Ok(ScheduleResult {
            cached: cache_age.is_some(),
            data,
            cache_age,
        })
    }

    /// Issue and catalog resolution for requests without an explicit URL.
    async fn resolve_file_url(
        &self,
        query: &ScheduleQuery,
        target_date: Option<NaiveDate>,
    ) -> Result<String, ServiceError> {
        let (lang, pub_code) = match (non_empty(&query.lang), non_empty(&query.pub_code)) {
            (None, None) => return Err(ServiceError::MissingParameters),
            (lang, pub_code) => (
                lang.unwrap_or(&self.defaults.lang),
                pub_code.unwrap_or(&self.defaults.pub_code),
            ),
        };

        let reference_date = target_date.unwrap_or_else(|| self.clock.now().date_naive());
        let issue = resolve_issue(pub_code, non_empty(&query.issue), reference_date)?;
        debug!(lang, pub_code, %issue, "resolving publication");

        let url = self
            .catalog
            .resolve_publication_url(lang, pub_code, &issue)
            .await?;
        debug!(%url, "catalog resolved file");

        Ok(url)
    }

    /// Cached payload and its age, or a fresh parse.
    async fn load(&self, file_url: &str) -> Result<(Payload, Option<u64>), ServiceError> {
        let fingerprint = fingerprint_of(file_url);

        if let Some(entry) = self.cache.get(&fingerprint).await {
            let age = entry.age_secs(self.clock.now());
            info!(%fingerprint, age, "cache hit");
            return Ok((entry.payload, Some(age)));
        }

        info!(file_url, "cache miss, parsing file");
        let payload: Payload = Arc::new(self.parser.parse(file_url).await?);
        self.cache.put(fingerprint, payload.clone()).await;

        Ok((payload, None))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
