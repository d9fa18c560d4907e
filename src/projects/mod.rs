pub mod store;
pub mod record;
pub mod normalize;
pub mod catalog;
pub mod memory_store;
pub mod supabase_store;
#[cfg(feature = "desktop")]
pub mod commands;

pub use store::{
    ProjectStore,
    StorageUrlResolver,
    OrderBy,
    RawRow,
};
pub use record::{ProjectRecord, FieldMap, FIELD_MAP};
pub use normalize::{normalize, ProjectView, CLIENT_FALLBACK, DESCRIPTION_FALLBACK};
pub use catalog::{ProjectCatalog, DEFAULT_BUCKET};
pub use memory_store::{InMemoryProjectStore, PrefixUrlResolver};
pub use supabase_store::SupabaseStore;
