use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use crate::error::ConfigError;
use crate::projects::DEFAULT_BUCKET;

/// Environment variables that override the settings file at load time.
pub const ENV_STORE_URL: &str = "PORTFOLIO_STORE_URL";
pub const ENV_STORE_ANON_KEY: &str = "PORTFOLIO_STORE_ANON_KEY";
pub const ENV_STORE_TABLE: &str = "PORTFOLIO_STORE_TABLE";
pub const ENV_STORE_BUCKET: &str = "PORTFOLIO_STORE_BUCKET";
pub const ENV_LOG_LEVEL: &str = "PORTFOLIO_LOG";

/// Main settings structure containing all application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Connection settings for the hosted project store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_keep_files")]
    pub keep_files: usize,
}

fn default_table() -> String {
    "projects".to_string()
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_level() -> String {
    "info".to_string()
}

fn default_keep_files() -> usize {
    5
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            table: default_table(),
            bucket: default_bucket(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            keep_files: default_keep_files(),
        }
    }
}

impl Settings {
    /// Apply process environment overrides. Overrides are never persisted.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`; blank values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_STORE_URL) {
            self.store.url = url;
        }
        if let Some(key) = get(ENV_STORE_ANON_KEY) {
            self.store.anon_key = key;
        }
        if let Some(table) = get(ENV_STORE_TABLE) {
            self.store.table = table;
        }
        if let Some(bucket) = get(ENV_STORE_BUCKET) {
            self.store.bucket = bucket;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        self
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()?;
        self.logging.validate()
    }
}

impl StoreSettings {
    /// Validates the connection settings only.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the store URL is empty or not http(s)
    /// - the anon key is empty
    /// - table or bucket is empty
    /// - timeout_secs is not in 1..=120
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }
        if self.anon_key.trim().is_empty() {
            return Err(ConfigError::MissingKey);
        }
        if self.table.trim().is_empty() {
            return Err(ConfigError::Invalid("table name cannot be empty".to_string()));
        }
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::Invalid("bucket name cannot be empty".to_string()));
        }
        if !(1..=120).contains(&self.timeout_secs) {
            return Err(ConfigError::Invalid(format!(
                "timeout_secs must be between 1 and 120, got {}",
                self.timeout_secs
            )));
        }
        Ok(())
    }
}

impl LoggingSettings {
    /// `level` takes env_logger filter syntax: comma-separated directives,
    /// each `level`, `module` or `module=level`, optionally followed by a
    /// `/regex` message filter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_log_filter(&self.level)?;
        if self.keep_files == 0 {
            return Err(ConfigError::Invalid("keep_files must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn validate_log_filter(filter: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::Invalid(format!("invalid log filter '{}'", filter));

    let directives = filter.split('/').next().unwrap_or_default();
    if directives.trim().is_empty() {
        return Err(invalid());
    }

    for directive in directives.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        let mut parts = directive.splitn(2, '=');
        let head = parts.next().unwrap_or_default().trim();
        match parts.next() {
            Some(level) => {
                if head.is_empty() || log::LevelFilter::from_str(level.trim()).is_err() {
                    return Err(invalid());
                }
            }
            // A bare word is either a level or a module path.
            None => {
                let is_module_path = head
                    .split("::")
                    .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_alphanumeric() || c == '_'));
                if log::LevelFilter::from_str(head).is_err() && !is_module_path {
                    return Err(invalid());
                }
            }
        }
    }
    Ok(())
}

/// Manages settings persistence and provides thread-safe access
pub struct SettingsManager {
    settings_path: PathBuf,
    current_settings: Arc<RwLock<Settings>>,
}

impl SettingsManager {
    /// Creates a new SettingsManager and loads `~/.portfolio/settings.json`
    ///
    /// If the settings file doesn't exist, creates it with default values.
    pub fn new() -> Result<Self, ConfigError> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| ConfigError::Invalid("failed to get home directory".to_string()))?;

        Self::new_with_path(home_dir.join(".portfolio").join("settings.json"))
    }

    /// Creates a new SettingsManager with a custom settings path
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The settings directory cannot be created
    /// - The settings file cannot be read or written
    pub fn new_with_path(settings_path: PathBuf) -> Result<Self, ConfigError> {
        if let Some(parent) = settings_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let settings = if settings_path.exists() {
            load_from_file(&settings_path)?
        } else {
            let defaults = Settings::default();
            save_to_file(&settings_path, &defaults)?;
            defaults
        };

        Ok(Self {
            settings_path,
            current_settings: Arc::new(RwLock::new(settings)),
        })
    }

    /// Returns a clone of the settings as stored on disk
    pub fn get(&self) -> Settings {
        match self.current_settings.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Stored settings with environment overrides applied
    pub fn effective(&self) -> Settings {
        self.get().with_env_overrides()
    }

    /// Updates settings (validates, persists to disk, then updates in-memory)
    ///
    /// If an error occurs, in-memory state remains unchanged.
    pub fn update(&self, settings: Settings) -> Result<(), ConfigError> {
        settings.validate()?;

        save_to_file(&self.settings_path, &settings)?;

        match self.current_settings.write() {
            Ok(mut guard) => *guard = settings,
            Err(poisoned) => *poisoned.into_inner() = settings,
        }
        Ok(())
    }
}

/// Loads settings from disk
///
/// If the file contains invalid JSON, logs a warning and returns defaults.
fn load_from_file(path: &Path) -> Result<Settings, ConfigError> {
    let contents = std::fs::read_to_string(path)?;

    match serde_json::from_str(&contents) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            log::warn!("Settings: Failed to parse {}: {}. Using defaults.", path.display(), e);
            Ok(Settings::default())
        }
    }
}

/// Saves settings to disk atomically via a temporary file and rename.
fn save_to_file(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(settings)?;

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, json)?;
    std::fs::rename(&temp_path, path)?;

    Ok(())
}
