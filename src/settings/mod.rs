pub mod manager;

#[cfg(feature = "desktop")]
pub mod commands;


pub use manager::{LoggingSettings, Settings, SettingsManager, StoreSettings};
