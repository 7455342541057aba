//! Requested-language validation against the project's language catalogue.

use crate::api::ApiClient;
use crate::error::{PullError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::info;

pub const LANGUAGES_PATH: &str = "projects/languages";

/// `GET /v2/projects/languages` response body. Only the fields we rely on
/// are declared; a body missing any of them is malformed.
#[derive(Debug, Deserialize)]
struct LanguageCatalogue {
    #[serde(rename = "_embedded")]
    embedded: EmbeddedLanguages,
}

#[derive(Debug, Deserialize)]
struct EmbeddedLanguages {
    languages: Vec<LanguageEntry>,
}

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    tag: String,
}

/// Decode a catalogue body into the set of known language tags
pub fn parse_language_tags(body: &[u8]) -> Result<HashSet<String>> {
    let catalogue: LanguageCatalogue =
        serde_json::from_slice(body).map_err(|source| PullError::MalformedResponse {
            endpoint: LANGUAGES_PATH.to_string(),
            source,
        })?;

    Ok(catalogue
        .embedded
        .languages
        .into_iter()
        .map(|lang| lang.tag)
        .collect())
}

/// Requested tags missing from `known`, in request order, without duplicates
pub fn find_nonexistent(requested: &[String], known: &HashSet<String>) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for tag in requested {
        if !known.contains(tag) && !missing.contains(tag) {
            missing.push(tag.clone());
        }
    }
    missing
}

/// Make sure every requested language exists in the project.
///
/// Must complete before the export is requested. An empty request means
/// "server default" and is accepted without contacting the service.
pub async fn validate(requested: &[String], client: &ApiClient) -> Result<()> {
    if requested.is_empty() {
        info!("No languages requested, using the project's default export languages");
        return Ok(());
    }

    let body = client.request(LANGUAGES_PATH, &[]).await?;
    let known = parse_language_tags(&body)?;

    let missing = find_nonexistent(requested, &known);
    if !missing.is_empty() {
        return Err(PullError::NonexistentLanguages(missing));
    }

    info!("✓ All {} requested languages exist", requested.len());
    Ok(())
}
