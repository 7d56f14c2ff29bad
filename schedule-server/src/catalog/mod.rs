//! Publication media catalog client.
//!
//! The catalog maps a (language, publication, issue) triple to the
//! downloadable files of that issue, grouped by file format. We only ever
//! need one URL out of it: the first EPUB, falling back to the first JWPUB.

mod client;
mod error;
mod types;

pub use client::{CatalogClient, CatalogConfig, PublicationCatalog};
pub use error::CatalogError;
pub use types::{CatalogResponse, FileLink, FileRef, LanguageFiles};
