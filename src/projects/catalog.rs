use std::sync::Arc;

use super::normalize::{normalize, ProjectView};
use super::record::{ProjectRecord, FIELD_MAP};
use super::store::{OrderBy, ProjectStore, RawRow, StorageUrlResolver};
use crate::error::FetchError;

/// Bucket holding project images unless configured otherwise.
pub const DEFAULT_BUCKET: &str = "project-images";

/// Column the list view is sorted by, newest first.
const LIST_ORDER_COLUMN: &str = "year";

/// Fetch pipeline behind the project list and detail views.
///
/// Fetch rows, map them to canonical records, resolve image keys and
/// normalize. The catalog owns no mutable state: it can be shared across
/// any number of concurrent callers, and an abandoned call leaves nothing
/// behind.
pub struct ProjectCatalog {
    store: Arc<dyn ProjectStore>,
    resolver: Arc<dyn StorageUrlResolver>,
    bucket: String,
}

impl ProjectCatalog {
    pub fn new(
        store: Arc<dyn ProjectStore>,
        resolver: Arc<dyn StorageUrlResolver>,
        bucket: &str,
    ) -> Self {
        Self {
            store,
            resolver,
            bucket: bucket.to_string(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// All projects, newest year first, in the order the store returned them.
    ///
    /// An empty table is an empty list. Store failures are not retried.
    pub async fn list_projects(&self) -> Result<Vec<ProjectView>, FetchError> {
        let rows = self
            .store
            .select_all(&OrderBy::desc(LIST_ORDER_COLUMN))
            .await
            .map_err(|e| {
                log::error!("Catalog: list_projects failed: {}", e);
                FetchError::Store(e)
            })?;

        let views = rows
            .iter()
            .map(|row| self.view_from_row(row))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("Catalog: list_projects returning {} projects", views.len());
        Ok(views)
    }

    /// One project by identifier.
    ///
    /// Returns `Ok(None)` without touching the store when `id` is empty:
    /// there is nothing to fetch yet. An identifier that is not an integer
    /// cannot match a row and is reported as `NotFound`.
    pub async fn get_project(&self, id: &str) -> Result<Option<ProjectView>, FetchError> {
        let token = id.trim();
        if token.is_empty() {
            return Ok(None);
        }

        let numeric_id = token.parse::<i64>().map_err(|_| {
            log::warn!("Catalog: get_project called with non-numeric id '{}'", token);
            FetchError::NotFound {
                id: token.to_string(),
            }
        })?;

        let row = self
            .store
            .select_by_id(numeric_id)
            .await
            .map_err(|e| {
                log::error!("Catalog: get_project id={} failed: {}", token, e);
                FetchError::Store(e)
            })?
            .ok_or_else(|| FetchError::NotFound {
                id: token.to_string(),
            })?;

        self.view_from_row(&row).map(Some)
    }

    /// Like `get_project`, for callers that may have no identifier at all.
    pub async fn get_requested_project(
        &self,
        id: Option<&str>,
    ) -> Result<Option<ProjectView>, FetchError> {
        match id {
            Some(id) => self.get_project(id).await,
            None => Ok(None),
        }
    }

    fn view_from_row(&self, row: &RawRow) -> Result<ProjectView, FetchError> {
        let record = ProjectRecord::from_row(row).map_err(|e| {
            log::error!("Catalog: malformed project row (field map v{}): {}", FIELD_MAP.version, e);
            FetchError::Store(format!(
                "malformed project row (field map v{}): {}",
                FIELD_MAP.version, e
            ))
        })?;

        Ok(normalize(record, |key| {
            self.resolver.public_url(&self.bucket, key)
        }))
    }
}
