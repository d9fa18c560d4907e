// Module declarations
pub mod error;
pub mod logging;
pub mod projects;
pub mod settings;

use std::sync::Arc;

pub use error::{ConfigError, FetchError};
pub use projects::{ProjectCatalog, ProjectView};
use projects::{InMemoryProjectStore, PrefixUrlResolver, SupabaseStore};
use settings::Settings;

/// Where sample-catalog images are looked up, relative to the frontend.
const SAMPLE_IMAGE_BASE: &str = "/images";

/// Build the catalog backed by the hosted store described in `settings`.
///
/// # Errors
///
/// Returns the first store validation or client construction error.
/// Logging settings play no part in choosing the data source.
pub fn hosted_catalog(settings: &Settings) -> Result<ProjectCatalog, ConfigError> {
    settings.store.validate()?;
    let store = Arc::new(SupabaseStore::from_settings(&settings.store)?);
    Ok(ProjectCatalog::new(store.clone(), store, &settings.store.bucket))
}

/// Catalog over the bundled sample projects.
pub fn sample_catalog(bucket: &str) -> ProjectCatalog {
    let store = InMemoryProjectStore::sample();
    log::info!("Catalog: Serving {} sample projects", store.len());
    ProjectCatalog::new(
        Arc::new(store),
        Arc::new(PrefixUrlResolver::new(SAMPLE_IMAGE_BASE)),
        bucket,
    )
}

/// Hosted catalog when configured, sample catalog otherwise.
///
/// Keeps the UI usable before the store has been set up.
pub fn catalog_from_settings(settings: &Settings) -> ProjectCatalog {
    match hosted_catalog(settings) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::warn!("Catalog: Hosted store unavailable ({}). Serving sample projects.", e);
            sample_catalog(&settings.store.bucket)
        }
    }
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use settings::SettingsManager;

    // Settings first: they carry the log level.
    let (manager, settings_error) = match SettingsManager::new() {
        Ok(manager) => (Some(Arc::new(manager)), None),
        Err(e) => (None, Some(e)),
    };
    let settings = match &manager {
        Some(manager) => manager.effective(),
        None => Settings::default().with_env_overrides(),
    };

    if let Some(dir) = logging::logs_dir() {
        logging::init(&dir, &settings.logging.level, settings.logging.keep_files);
    }
    if let Some(e) = settings_error {
        log::warn!("Settings: Failed to load settings file: {}. Using defaults.", e);
    }

    let catalog = Arc::new(catalog_from_settings(&settings));

    let mut builder = tauri::Builder::default().manage(catalog);
    // Settings commands fail with an unmanaged-state error when no settings
    // file could be opened.
    if let Some(manager) = manager {
        builder = builder.manage(manager);
    }

    builder
        .invoke_handler(tauri::generate_handler![
            projects::commands::list_projects,
            projects::commands::get_project,
            settings::commands::get_settings,
            settings::commands::update_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
