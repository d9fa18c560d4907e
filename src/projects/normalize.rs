use serde::{Deserialize, Serialize};

use super::record::ProjectRecord;

/// Shown when a project has no client on record.
pub const CLIENT_FALLBACK: &str = "Confidential";

/// Shown when a project has no description.
pub const DESCRIPTION_FALLBACK: &str = "No description available";

/// Presentation-ready project, as consumed by the list and detail views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: i64,
    pub title: String,
    pub tags: String,
    pub year: String,
    pub client_name: String,
    pub description: String,
    /// `None` when the record has no main image. Never an empty string.
    pub image_url: Option<String>,
    pub gallery_urls: Vec<String>,
}

/// Map one raw record to its view model.
///
/// Total and pure: no I/O, no failure, and `resolve_url` is called exactly
/// once per image reference in the record.
pub fn normalize<F>(raw: ProjectRecord, resolve_url: F) -> ProjectView
where
    F: Fn(&str) -> String,
{
    let image_url = raw.image_ref.as_deref().map(&resolve_url);

    let gallery_urls = raw
        .gallery_refs
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|key| resolve_url(key))
        .collect();

    ProjectView {
        id: raw.id,
        title: raw.title,
        tags: raw.tags,
        year: raw.year,
        client_name: raw.client_name.unwrap_or_else(|| CLIENT_FALLBACK.to_string()),
        description: raw
            .description
            .unwrap_or_else(|| DESCRIPTION_FALLBACK.to_string()),
        image_url,
        gallery_urls,
    }
}
