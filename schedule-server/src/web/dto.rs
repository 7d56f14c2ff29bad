//! Data transfer objects for web requests and responses.

use serde::Serialize;

use crate::domain::ScheduleItem;
use crate::service::{ScheduleQuery, ScheduleResult};

/// Query string of `GET /api/parse`.
#[derive(Debug, Default)]
pub struct ParseRequest {
    /// Explicit file URL; bypasses issue and catalog resolution
    pub url: Option<String>,

    /// Language code (e.g., "E")
    pub lang: Option<String>,

    /// Publication code (`pub`), "mwb" or "w" when the issue is computed
    pub pub_code: Option<String>,

    /// Explicit issue (YYYYMM)
    pub issue: Option<String>,

    /// Date used for the issue and for filtering to one week
    pub date: Option<String>,
}

impl ParseRequest {
    /// Collect the known parameters from raw query pairs.
    ///
    /// A parameter given more than once counts as absent, as does one that
    /// is never given.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let single = |name: &str| {
            let mut values = pairs.iter().filter(|(k, _)| k == name).map(|(_, v)| v);
            match (values.next(), values.next()) {
                (Some(value), None) => Some(value.clone()),
                _ => None,
            }
        };

        Self {
            url: single("url"),
            lang: single("lang"),
            pub_code: single("pub"),
            issue: single("issue"),
            date: single("date"),
        }
    }
}

impl From<ParseRequest> for ScheduleQuery {
    fn from(req: ParseRequest) -> Self {
        Self {
            url: req.url,
            lang: req.lang,
            pub_code: req.pub_code,
            issue: req.issue,
            date: req.date,
        }
    }
}

/// Successful response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    /// Whether the data came from the cache
    pub cached: bool,

    /// Schedule items
    pub data: Vec<ScheduleItem>,

    /// Age of the cache entry in seconds (hits only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_age: Option<u64>,
}

impl From<ScheduleResult> for ParseResponse {
    fn from(result: ScheduleResult) -> Self {
        Self {
            cached: result.cached,
            data: result.data,
            cache_age: result.cache_age,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error summary
    pub error: String,

    /// Underlying cause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Example of a valid request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            example: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn request_reads_pub_field() {
        let req = ParseRequest::from_pairs(&pairs(&[
            ("lang", "E"),
            ("pub", "w"),
            ("issue", "202411"),
            ("unrelated", "x"),
        ]));
        let query = ScheduleQuery::from(req);
        assert_eq!(query.lang.as_deref(), Some("E"));
        assert_eq!(query.pub_code.as_deref(), Some("w"));
        assert_eq!(query.issue.as_deref(), Some("202411"));
        assert_eq!(query.url, None);
        assert_eq!(query.date, None);
    }

    #[test]
    fn repeated_parameter_is_absent() {
        let req = ParseRequest::from_pairs(&pairs(&[
            ("lang", "E"),
            ("pub", "mwb"),
            ("lang", "S"),
        ]));
        assert_eq!(req.lang, None);
        assert_eq!(req.pub_code.as_deref(), Some("mwb"));
    }

    #[test]
    fn miss_has_no_cache_age() {
        let response = ParseResponse::from(ScheduleResult {
            cached: false,
            data: vec![],
            cache_age: None,
        });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "cached": false, "data": [] })
        );
    }

    #[test]
    fn hit_reports_cache_age() {
        let response = ParseResponse::from(ScheduleResult {
            cached: true,
            data: vec![ScheduleItem::new(json!({ "mwb_week_date": "2024/11/04" }))],
            cache_age: Some(42),
        });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "cached": true,
                "data": [{ "mwb_week_date": "2024/11/04" }],
                "cacheAge": 42
            })
        );
    }

    #[test]
    fn error_omits_empty_fields() {
        let body = ErrorResponse::new("Method not allowed");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "error": "Method not allowed" })
        );

        let body = ErrorResponse::new("Failed to fetch publication").with_message("No file found");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "error": "Failed to fetch publication", "message": "No file found" })
        );
    }
}
