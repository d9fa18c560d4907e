use async_trait::async_trait;
use serde_json::{Map, Value};

/// A row exactly as the store returned it: column name → JSON value.
pub type RawRow = Map<String, Value>;

/// Sort instruction for the select-all query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            descending: true,
        }
    }
}

/// Backend-agnostic, read-only access to the project table.
///
/// The catalog calls this trait, never a concrete implementation.
/// Follows the same pattern as `StorageUrlResolver`: one trait per
/// collaborator capability, shared as `Arc<dyn _>`.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Return every row, sorted by `order`.
    ///
    /// An empty table is `Ok(vec![])`, not an error.
    async fn select_all(&self, order: &OrderBy) -> Result<Vec<RawRow>, String>;

    /// Return the row whose `id` column equals `id`, or `None` when no row
    /// matches. `Err` is reserved for query failures.
    async fn select_by_id(&self, id: i64) -> Result<Option<RawRow>, String>;
}

/// Object-storage public URL lookup.
///
/// Implementations MUST be deterministic and side-effect free: the same
/// (bucket, key) always yields the same URL. They never report a missing
/// object.
pub trait StorageUrlResolver: Send + Sync {
    fn public_url(&self, bucket: &str, key: &str) -> String;
}
