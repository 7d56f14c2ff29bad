//! Catalog response types.
//!
//! Only the parts of the media-links document we read are modelled; serde
//! ignores everything else.

use std::collections::HashMap;

use serde::Deserialize;

/// Top-level media-links response.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogResponse {
    /// Files keyed by language code.
    #[serde(default)]
    pub files: HashMap<String, LanguageFiles>,
}

/// Files of one language, grouped by format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageFiles {
    #[serde(rename = "EPUB", default)]
    pub epub: Vec<FileLink>,

    #[serde(rename = "JWPUB", default)]
    pub jwpub: Vec<FileLink>,
}

/// A single file entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FileLink {
    pub file: FileRef,
}

/// Location of a file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileRef {
    pub url: String,
}

impl LanguageFiles {
    /// First EPUB if any, otherwise first JWPUB.
    pub fn preferred_url(&self) -> Option<&str> {
        self.epub
            .first()
            .or_else(|| self.jwpub.first())
            .map(|link| link.file.url.as_str())
    }
}

impl CatalogResponse {
    /// Preferred download URL for `lang`.
    pub fn preferred_url(&self, lang: &str) -> Option<&str> {
        self.files.get(lang)?.preferred_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> CatalogResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn prefers_epub() {
        let response = parse(
            r#"{"files":{"E":{
                "JWPUB":[{"file":{"url":"https://cdn.example/mwb_E_202411.jwpub"}}],
                "EPUB":[{"file":{"url":"https://cdn.example/mwb_E_202411.epub"}},
                        {"file":{"url":"https://cdn.example/other.epub"}}]
            }}}"#,
        );
        assert_eq!(
            response.preferred_url("E"),
            Some("https://cdn.example/mwb_E_202411.epub")
        );
    }

    #[test]
    fn falls_back_to_jwpub() {
        let response = parse(
            r#"{"files":{"E":{
                "EPUB":[],
                "JWPUB":[{"file":{"url":"https://cdn.example/mwb_E_202411.jwpub"}}]
            }}}"#,
        );
        assert_eq!(
            response.preferred_url("E"),
            Some("https://cdn.example/mwb_E_202411.jwpub")
        );
    }

    #[test]
    fn no_supported_format() {
        let response = parse(
            r#"{"files":{"E":{"PDF":[{"file":{"url":"https://cdn.example/mwb.pdf"}}]}}}"#,
        );
        assert_eq!(response.preferred_url("E"), None);
    }

    #[test]
    fn missing_language() {
        let response = parse(
            r#"{"files":{"S":{"EPUB":[{"file":{"url":"https://cdn.example/mwb_S.epub"}}]}}}"#,
        );
        assert_eq!(response.preferred_url("E"), None);
        assert_eq!(response.preferred_url("S"), Some("https://cdn.example/mwb_S.epub"));
    }

    #[test]
    fn ignores_unknown_fields() {
        let response = parse(
            r#"{"pubName":"Workbook","files":{"E":{"EPUB":[{"title":"x","file":{"url":"u","checksum":"c"}}]}}}"#,
        );
        assert_eq!(response.preferred_url("E"), Some("u"));
    }
}
