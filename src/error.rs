use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

/// Failure reasons for the project fetch pipeline.
///
/// Every variant renders a stable, human-readable message suitable for
/// direct display. Callers switch on the variant (or `kind()`), never on
/// the message text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The row query failed at the store boundary (transport, HTTP status,
    /// or rows that do not satisfy the record contract).
    #[error("Failed to load projects: {0}")]
    Store(String),

    /// The detail query matched no row.
    #[error("Project not found (id: {id})")]
    NotFound { id: String },
}

impl FetchError {
    /// Stable tag sent to the frontend alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Store(_) => "store",
            FetchError::NotFound { .. } => "notFound",
        }
    }
}

impl Serialize for FetchError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FetchError", 2)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Startup configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Store URL is missing")]
    MissingUrl,

    #[error("Store URL must start with http:// or https://, got '{0}'")]
    InvalidUrl(String),

    #[error("Store anon key is missing")]
    MissingKey,

    #[error("Invalid setting: {0}")]
    Invalid(String),

    #[error("Settings file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}
