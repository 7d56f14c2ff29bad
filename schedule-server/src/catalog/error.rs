//! Catalog error types.

/// Errors that can occur when resolving a publication through the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog answered with a non-success status
    #[error("Publication not found (catalog returned {status})")]
    NotFound { status: u16 },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Issue exists but has neither an EPUB nor a JWPUB file
    #[error("No file found")]
    NoDownloadableFile,
}
