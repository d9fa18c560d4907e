use async_trait::async_trait;
use serde_json::{json, Value};
use std::cmp::Ordering;

use super::record::row_id;
use super::store::{OrderBy, ProjectStore, RawRow, StorageUrlResolver};

/// Store backed by a fixed set of rows held in memory.
///
/// Rows go through the same mapping and normalization as rows from the
/// hosted store. Used offline and in tests.
pub struct InMemoryProjectStore {
    rows: Vec<RawRow>,
}

impl InMemoryProjectStore {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    /// Build from JSON objects. Non-object values are ignored.
    pub fn from_values(values: Vec<Value>) -> Self {
        Self::new(
            values
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
        )
    }

    /// The catalog that shipped with the first version of the work page.
    pub fn sample() -> Self {
        Self::from_values(vec![
            json!({
                "id": 1,
                "title": "Sharlee",
                "tags": "Branding, UX/UI Design, Web Development",
                "year": "2024",
                "image_url": "sharlee/cover.jpg",
                "gallery_images": ["sharlee/01.jpg", "sharlee/02.jpg"]
            }),
            json!({
                "id": 2,
                "title": "Cocolyze",
                "tags": "Branding, Web Design",
                "year": "2023",
                "image_url": "cocolyze/cover.jpg"
            }),
            json!({
                "id": 3,
                "title": "Portraits",
                "tags": "Illustration, Art Direction",
                "year": "2023",
                "image_url": "portraits/cover.jpg"
            }),
            json!({
                "id": 4,
                "title": "Cosmetics Brand",
                "tags": "Branding, Packaging",
                "year": "2022",
                "image_url": "cosmetics/cover.jpg"
            }),
        ])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Compare two non-null column values as text, the way the mapped record
/// sees them: numbers by their decimal form, strings without quotes.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    sort_text(a).cmp(&sort_text(b))
}

fn sort_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn select_all(&self, order: &OrderBy) -> Result<Vec<RawRow>, String> {
        let mut rows = self.rows.clone();
        // Stable sort keeps insertion order between equal keys. Nulls sort
        // last in both directions, like the hosted store.
        rows.sort_by(|a, b| {
            match (a.get(&order.column), b.get(&order.column)) {
                (Some(x), Some(y)) if !x.is_null() && !y.is_null() => {
                    if order.descending {
                        compare_values(y, x)
                    } else {
                        compare_values(x, y)
                    }
                }
                (x, y) => is_nullish(x).cmp(&is_nullish(y)),
            }
        });
        Ok(rows)
    }

    async fn select_by_id(&self, id: i64) -> Result<Option<RawRow>, String> {
        Ok(self
            .rows
            .iter()
            .find(|row| row_id(row) == Some(id))
            .cloned())
    }
}

fn is_nullish(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Resolver that joins a fixed base URL, the bucket and the key.
pub struct PrefixUrlResolver {
    base: String,
}

impl PrefixUrlResolver {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }
}

impl StorageUrlResolver for PrefixUrlResolver {
    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.base, bucket, key.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years(rows: &[RawRow]) -> Vec<String> {
        rows.iter()
            .map(|r| r["year"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_select_all_sorts_by_year_desc() {
        let store = InMemoryProjectStore::from_values(vec![
            json!({ "id": 1, "year": "2022" }),
            json!({ "id": 2, "year": "2024" }),
            json!({ "id": 3, "year": "2023" }),
        ]);

        let rows = store.select_all(&OrderBy::desc("year")).await.unwrap();
        assert_eq!(years(&rows), vec!["2024", "2023", "2022"]);

        let ascending = OrderBy {
            column: "year".to_string(),
            descending: false,
        };
        let rows = store.select_all(&ascending).await.unwrap();
        assert_eq!(years(&rows), vec!["2022", "2023", "2024"]);
    }

    #[tokio::test]
    async fn test_select_all_mixed_year_types_sort_as_text() {
        let store = InMemoryProjectStore::from_values(vec![
            json!({ "id": 1, "year": 2021 }),
            json!({ "id": 2, "year": "2024" }),
            json!({ "id": 3, "year": 2023 }),
        ]);

        let rows = store.select_all(&OrderBy::desc("year")).await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_select_all_keeps_nulls_last() {
        let store = InMemoryProjectStore::from_values(vec![
            json!({ "id": 1, "year": null }),
            json!({ "id": 2, "year": "2021" }),
            json!({ "id": 3, "year": "2025" }),
        ]);

        let rows = store.select_all(&OrderBy::desc("year")).await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_select_by_id() {
        let store = InMemoryProjectStore::sample();
        let row = store.select_by_id(3).await.unwrap().unwrap();
        assert_eq!(row["title"], "Portraits");
        assert!(store.select_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_select_by_id_matches_string_ids() {
        let store = InMemoryProjectStore::from_values(vec![
            json!({ "id": "5", "title": "Five" }),
            json!({ "id": 6, "title": "Six" }),
        ]);

        let row = store.select_by_id(5).await.unwrap().unwrap();
        assert_eq!(row["title"], "Five");
        let row = store.select_by_id(6).await.unwrap().unwrap();
        assert_eq!(row["title"], "Six");
    }

    #[test]
    fn test_sample_catalog_has_four_projects() {
        let store = InMemoryProjectStore::sample();
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_prefix_resolver_joins_segments() {
        let resolver = PrefixUrlResolver::new("https://cdn.example.com/");
        assert_eq!(
            resolver.public_url("project-images", "/a.jpg"),
            "https://cdn.example.com/project-images/a.jpg"
        );
    }
}
