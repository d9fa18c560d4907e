use std::sync::Arc;
use tauri::State;

use super::catalog::ProjectCatalog;
use super::normalize::ProjectView;
use crate::error::FetchError;

#[tauri::command]
pub async fn list_projects(
    catalog: State<'_, Arc<ProjectCatalog>>,
) -> Result<Vec<ProjectView>, FetchError> {
    catalog.list_projects().await
}

/// `null` means there was no identifier to fetch yet. A missing or `null`
/// `id` argument is treated the same as an empty one.
#[tauri::command]
pub async fn get_project(
    id: Option<String>,
    catalog: State<'_, Arc<ProjectCatalog>>,
) -> Result<Option<ProjectView>, FetchError> {
    catalog.get_requested_project(id.as_deref()).await
}
