//! Parser error types.

/// Errors from the publication parser.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Parser rejected the file
    #[error("parser error {status}: {message}")]
    Api { status: u16, message: String },

    /// Parser output was not a list of schedule records
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
