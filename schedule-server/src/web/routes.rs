//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, warn};

use crate::domain::DomainError;
use crate::service::ServiceError;

use super::dto::*;
use super::state::AppState;

/// Shown to callers that give neither a URL nor a publication.
const USAGE_EXAMPLE: &str = "/api/parse?url=https://example.com/file.jwpub&date=2024-11-04 or /api/parse?lang=E&pub=mwb&issue=202411&date=2024-11-04";

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/parse",
            get(parse_schedule)
                .head(method_not_allowed)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(cors_layer())
        .with_state(state)
}

/// Any origin may read the schedule from a browser.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Bare OPTIONS request (no CORS preflight headers).
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Resolve, parse (or serve from cache) and optionally filter a schedule.
async fn parse_schedule(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ParseResponse>, AppError> {
    let Query(pairs) = query.map_err(|rejection| AppError::BadRequest {
        error: rejection.body_text(),
        example: Some(USAGE_EXAMPLE),
    })?;
    let req = ParseRequest::from_pairs(&pairs);
    let result = state.schedules.fetch_schedule(&req.into()).await?;
    Ok(Json(result.into()))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest {
        error: String,
        example: Option<&'static str>,
    },
    NotFound {
        message: String,
    },
    Internal {
        message: String,
    },
    MethodNotAllowed,
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::MissingParameters => AppError::BadRequest {
                error: e.to_string(),
                example: Some(USAGE_EXAMPLE),
            },
            ServiceError::InvalidDate(_) => AppError::BadRequest {
                error: e.to_string(),
                example: Some(USAGE_EXAMPLE),
            },
            ServiceError::Issue(DomainError::InvalidPublicationType(_)) => AppError::BadRequest {
                error: e.to_string(),
                example: None,
            },
            ServiceError::PublicationNotFound(cause) => AppError::NotFound {
                message: cause.to_string(),
            },
            ServiceError::ParseFailure(cause) => AppError::Internal {
                message: cause.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest { error, example } => {
                warn!(%error, "bad request");
                let mut body = ErrorResponse::new(error);
                if let Some(example) = example {
                    body = body.with_example(example);
                }
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::NotFound { message } => {
                warn!(%message, "publication not found");
                let body = ErrorResponse::new("Failed to fetch publication").with_message(message);
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            AppError::Internal { message } => {
                error!(%message, "error parsing file");
                let body = ErrorResponse::new("Failed to parse file").with_message(message);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "GET, OPTIONS")],
                Json(ErrorResponse::new("Method not allowed")),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
