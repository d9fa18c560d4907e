// SupabaseStore - project rows via PostgREST, image URLs via public object storage

use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

use super::store::{OrderBy, ProjectStore, RawRow, StorageUrlResolver};
use crate::error::ConfigError;
use crate::settings::StoreSettings;

/// Read-only client for a hosted Supabase project.
///
/// Constructed once at startup from settings and shared as
/// `Arc<dyn ProjectStore>` / `Arc<dyn StorageUrlResolver>`. Holds no mutable
/// state, so concurrent calls need no coordination.
pub struct SupabaseStore {
    base: Url,
    anon_key: String,
    table: String,
    client: Client,
}

impl SupabaseStore {
    pub fn new(
        base_url: &str,
        anon_key: &str,
        table: &str,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        if anon_key.trim().is_empty() {
            return Err(ConfigError::MissingKey);
        }

        let base = Url::parse(base_url)
            .map_err(|_| ConfigError::InvalidUrl(base_url.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        let key_hint: String = anon_key.chars().take(8).collect();
        log::info!(
            "Store/Supabase: Initialized for {} table='{}' key={}...",
            base,
            table,
            key_hint
        );

        Ok(Self {
            base,
            anon_key: anon_key.to_string(),
            table: table.to_string(),
            client,
        })
    }

    pub fn from_settings(settings: &StoreSettings) -> Result<Self, ConfigError> {
        Self::new(
            &settings.url,
            &settings.anon_key,
            &settings.table,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// `{base}/rest/v1/{table}`
    fn table_url(&self) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["rest", "v1", self.table.as_str()]);
        }
        url
    }

    async fn fetch_rows(&self, query: &[(&str, String)]) -> Result<Vec<RawRow>, String> {
        let response = self
            .client
            .get(self.table_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| format!("request to store failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::warn!("Store/Supabase: API error {} - {}", status, body);
            return Err(format!("store returned {}: {}", status, body));
        }

        response
            .json::<Vec<RawRow>>()
            .await
            .map_err(|e| format!("failed to parse store response: {}", e))
    }
}

/// PostgREST ordering syntax. Nulls go last in both directions.
fn order_param(order: &OrderBy) -> String {
    let direction = if order.descending { "desc" } else { "asc" };
    format!("{}.{}.nullslast", order.column, direction)
}

#[async_trait]
impl ProjectStore for SupabaseStore {
    async fn select_all(&self, order: &OrderBy) -> Result<Vec<RawRow>, String> {
        log::debug!("Store/Supabase: select_all table='{}' order={:?}", self.table, order);

        let rows = self
            .fetch_rows(&[("select", "*".to_string()), ("order", order_param(order))])
            .await?;

        log::debug!("Store/Supabase: select_all returned {} rows", rows.len());
        Ok(rows)
    }

    async fn select_by_id(&self, id: i64) -> Result<Option<RawRow>, String> {
        log::debug!("Store/Supabase: select_by_id table='{}' id={}", self.table, id);

        let rows = self
            .fetch_rows(&[
                ("select", "*".to_string()),
                ("id", format!("eq.{}", id)),
                ("limit", "1".to_string()),
            ])
            .await?;

        Ok(rows.into_iter().next())
    }
}

impl StorageUrlResolver for SupabaseStore {
    /// `{base}/storage/v1/object/public/{bucket}/{key}` with empty key
    /// segments dropped and every segment percent-encoded.
    fn public_url(&self, bucket: &str, key: &str) -> String {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["storage", "v1", "object", "public", bucket])
                .extend(key.split('/').filter(|s| !s.is_empty()));
        }
        url.to_string()
    }
}
