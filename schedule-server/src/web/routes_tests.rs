//! End-to-end tests: router + real catalog client against a fake catalog.

use super::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use crate::cache::{CacheConfig, ScheduleCache};
use crate::catalog::{CatalogClient, CatalogConfig};
use crate::clock::ManualClock;
use crate::domain::ScheduleItem;
use crate::parser::{ParserError, ScheduleParser};
use crate::service::{RequestDefaults, ScheduleService};

const NOVEMBER_JWPUB: &str = "https://cdn.example/mwb_E_202411.jwpub";

type Lookups = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Catalog that only knows the November 2024 workbook, as JWPUB only.
async fn catalog_handler(
    State(lookups): State<Lookups>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let issue = params.get("issue").cloned().unwrap_or_default();
    lookups.lock().unwrap().push(params.clone());

    if params.get("pub").map(String::as_str) == Some("mwb") && issue == "202411" {
        let body = json!({
            "files": { "E": {
                "EPUB": [],
                "JWPUB": [
                    { "file": { "url": NOVEMBER_JWPUB } },
                    { "file": { "url": "https://cdn.example/second.jwpub" } }
                ]
            }}
        });
        return Json(body).into_response();
    }
    if issue == "202409" {
        return Json(json!({ "files": { "E": { "PDF": [] } } })).into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}

/// Parser returning one item per November week, recording requested URLs.
#[derive(Default)]
struct RecordingParser {
    urls: Mutex<Vec<String>>,
}

#[async_trait]
impl ScheduleParser for RecordingParser {
    async fn parse(&self, url: &str) -> Result<Vec<ScheduleItem>, ParserError> {
        self.urls.lock().unwrap().push(url.to_string());
        if url.contains("broken") {
            return Err(ParserError::Json {
                message: "unexpected end of archive".into(),
            });
        }
        Ok(["2024/11/04", "2024/11/11", "2024/11/18", "2024/11/25"]
            .into_iter()
            .map(|d| ScheduleItem::new(json!({ "mwb_week_date": d, "title": format!("Week of {d}") })))
            .collect())
    }
}

struct TestServer {
    base: String,
    http: reqwest::Client,
    lookups: Lookups,
    parser: Arc<RecordingParser>,
}

impl TestServer {
    async fn start() -> Self {
        let lookups: Lookups = Arc::default();
        let catalog_app = Router::new()
            .route("/links", get(catalog_handler))
            .with_state(lookups.clone());
        let catalog_base = serve(catalog_app).await;

        let catalog = CatalogClient::new(
            CatalogConfig::default().with_base_url(format!("{catalog_base}/links")),
        )
        .unwrap();
        let parser = Arc::new(RecordingParser::default());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 11, 6, 12, 0, 0).unwrap(),
        ));
        let cache = Arc::new(ScheduleCache::new(&CacheConfig::default(), clock.clone()));
        let service = ScheduleService::new(
            Arc::new(catalog),
            parser.clone(),
            cache,
            clock,
            RequestDefaults::default(),
        );

        let base = serve(create_router(AppState::new(service))).await;

        Self {
            base,
            http: reqwest::Client::new(),
            lookups,
            parser,
        }
    }

    async fn get(&self, query: &str) -> (StatusCode, Value) {
        let response = self
            .http
            .get(format!("{}/api/parse{query}", self.base))
            .send()
            .await
            .unwrap();
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
        let body = response.json().await.unwrap();
        (status, body)
    }

    fn parsed_urls(&self) -> Vec<String> {
        self.parser.urls.lock().unwrap().clone()
    }

    fn lookup_field(&self, name: &str) -> Vec<String> {
        self.lookups
            .lock()
            .unwrap()
            .iter()
            .map(|params| params.get(name).cloned().unwrap_or_default())
            .collect()
    }

    fn issues(&self) -> Vec<String> {
        self.lookup_field("issue")
    }

    fn catalog_langs(&self) -> Vec<String> {
        self.lookup_field("langwritten")
    }
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn weekly_meeting_by_date_then_cached() {
    let server = TestServer::start().await;

    let (status, body) = server.get("?lang=E&pub=mwb&date=2024-11-04").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], false);
    assert!(body.get("cacheAge").is_none());
    assert_eq!(
        body["data"],
        json!([{ "mwb_week_date": "2024/11/04", "title": "Week of 2024/11/04" }])
    );
    assert_eq!(server.issues(), vec!["202411"]);
    assert_eq!(server.parsed_urls(), vec![NOVEMBER_JWPUB]);

    let (status, body) = server.get("?lang=E&pub=mwb&date=2024-11-04").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], true);
    assert!(body["cacheAge"].as_u64().is_some());
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(server.parsed_urls().len(), 1);
}

#[tokio::test]
async fn explicit_url_shares_cache_with_catalog_lookup() {
    let server = TestServer::start().await;

    let (_, body) = server.get("?lang=E&pub=mwb&issue=202411").await;
    assert_eq!(body["cached"], false);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);

    let (status, body) = server
        .get(&format!("?url={NOVEMBER_JWPUB}&date=2024-11-24"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], true);
    assert_eq!(body["data"][0]["mwb_week_date"], "2024/11/18");
    assert_eq!(server.parsed_urls().len(), 1);
    assert_eq!(server.issues().len(), 1);
}

#[tokio::test]
async fn repeated_language_falls_back_to_default() {
    let server = TestServer::start().await;

    let (status, body) = server.get("?lang=E&lang=S&pub=mwb&issue=202411").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);
    assert_eq!(server.catalog_langs(), vec!["E"]);
}

#[tokio::test]
async fn repeated_url_counts_as_missing() {
    let server = TestServer::start().await;

    let (status, body) = server
        .get("?url=https://cdn.example/a.epub&url=https://cdn.example/b.epub")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Missing required parameters: url or (lang and pub)"
    );
    assert_eq!(body["example"], USAGE_EXAMPLE);
    assert!(server.parsed_urls().is_empty());
}

#[tokio::test]
async fn missing_parameters() {
    let server = TestServer::start().await;

    let (status, body) = server.get("?date=2024-11-04").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Missing required parameters: url or (lang and pub)"
    );
    assert_eq!(body["example"], USAGE_EXAMPLE);
}

#[tokio::test]
async fn invalid_publication_type() {
    let server = TestServer::start().await;

    let (status, body) = server.get("?lang=E&pub=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid pub type. Use 'mwb' or 'w'");
    assert!(server.issues().is_empty());
}

#[tokio::test]
async fn invalid_date() {
    let server = TestServer::start().await;

    let (status, body) = server.get("?lang=E&pub=mwb&date=whenever").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid date: whenever");
}

#[tokio::test]
async fn unknown_issue_is_not_found() {
    let server = TestServer::start().await;

    let (status, body) = server.get("?lang=E&pub=mwb&issue=199901").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Failed to fetch publication");
    assert_eq!(body["message"], "Publication not found (catalog returned 404)");
}

#[tokio::test]
async fn issue_without_files_is_not_found() {
    let server = TestServer::start().await;

    let (status, body) = server.get("?lang=E&pub=mwb&issue=202409").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No file found");
    assert!(server.parsed_urls().is_empty());
}

#[tokio::test]
async fn parse_failure_is_internal_error() {
    let server = TestServer::start().await;

    let (status, body) = server.get("?url=https://cdn.example/broken.epub").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to parse file");
    assert_eq!(body["message"], "JSON parse error: unexpected end of archive");
}

#[tokio::test]
async fn other_methods_not_allowed() {
    let server = TestServer::start().await;

    let response = server
        .http
        .post(format!("{}/api/parse", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 405);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Method not allowed" }));

    let response = server
        .http
        .head(format!("{}/api/parse?url=https://cdn.example/a.epub", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 405);
    assert_eq!(response.headers()["allow"], "GET, OPTIONS");
    assert!(server.parsed_urls().is_empty());
}

#[tokio::test]
async fn options_returns_empty_ok() {
    let server = TestServer::start().await;

    let response = server
        .http
        .request(reqwest::Method::OPTIONS, format!("{}/api/parse", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let server = TestServer::start().await;

    let response = server
        .http
        .request(reqwest::Method::OPTIONS, format!("{}/api/parse", server.base))
        .header("Origin", "https://schedule.example")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("GET"));
    assert!(methods.contains("OPTIONS"));
    let allowed = headers["access-control-allow-headers"].to_str().unwrap();
    assert!(allowed.to_ascii_lowercase().contains("content-type"));
}

#[tokio::test]
async fn cors_header_on_get() {
    let server = TestServer::start().await;

    let response = server
        .http
        .get(format!("{}/api/parse?lang=E&pub=x", server.base))
        .header("Origin", "https://schedule.example")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn health_check() {
    let server = TestServer::start().await;

    let text = server
        .http
        .get(format!("{}/health", server.base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(text, "ok");
}
