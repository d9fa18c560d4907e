use std::sync::Arc;
use tauri::{Emitter, State};

use super::manager::{Settings, SettingsManager};

/// Settings as stored on disk, without environment overrides.
#[tauri::command]
pub fn get_settings(manager: State<'_, Arc<SettingsManager>>) -> Settings {
    manager.get()
}

/// Validate and persist new settings, then emit `settings-changed`.
///
/// The catalog keeps the store it was built with; a new store takes
/// effect on the next launch.
#[tauri::command]
pub fn update_settings(
    settings: Settings,
    manager: State<'_, Arc<SettingsManager>>,
    app_handle: tauri::AppHandle,
) -> Result<(), String> {
    manager.update(settings.clone()).map_err(|e| e.to_string())?;
    log::info!("Settings: Saved. Store changes apply on next launch.");

    app_handle
        .emit("settings-changed", &settings)
        .map_err(|e| format!("Failed to emit settings-changed event: {}", e))?;

    Ok(())
}
