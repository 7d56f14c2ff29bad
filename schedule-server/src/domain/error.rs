//! Domain error types.
//!
//! These errors come from request values that cannot be turned into a
//! catalog query. They are distinct from catalog and parser I/O errors.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Publication code has no issue cadence we know how to compute
    #[error("Invalid pub type. Use 'mwb' or 'w'")]
    InvalidPublicationType(String),
}
