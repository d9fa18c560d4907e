use serde_json::Value;

use super::store::RawRow;

/// Column spellings accepted for each canonical record field.
///
/// Rows written by different revisions of the site use different column
/// names for the same data. Every rename is absorbed here; the rest of the
/// pipeline only sees `ProjectRecord`. Spellings are tried in order and the
/// first one holding a non-null value wins.
#[derive(Debug)]
pub struct FieldMap {
    pub version: u32,
    pub id: &'static [&'static str],
    pub title: &'static [&'static str],
    pub tags: &'static [&'static str],
    pub year: &'static [&'static str],
    pub client_name: &'static [&'static str],
    pub description: &'static [&'static str],
    pub image_ref: &'static [&'static str],
    pub gallery_refs: &'static [&'static str],
}

pub const FIELD_MAP: FieldMap = FieldMap {
    version: 3,
    id: &["id"],
    title: &["title"],
    tags: &["tags"],
    year: &["year"],
    client_name: &["client_name", "clientName", "client"],
    description: &["description"],
    image_ref: &["image_url", "imageUrl", "main_image", "image"],
    gallery_refs: &["gallery_images", "galleryImages", "gallery"],
};

/// A project row in canonical shape, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectRecord {
    pub id: i64,
    pub title: String,
    pub tags: String,
    pub year: String,
    pub client_name: Option<String>,
    pub description: Option<String>,
    /// Storage key of the main image.
    pub image_ref: Option<String>,
    /// Storage keys of the gallery, in display order.
    pub gallery_refs: Option<Vec<String>>,
}

impl ProjectRecord {
    /// Adapt a raw store row to the canonical record using `FIELD_MAP`.
    ///
    /// Optional text is absent when the column is missing, `null`, or blank.
    /// A gallery is only present when it is an array made entirely of strings.
    ///
    /// # Errors
    ///
    /// Returns an error naming the field when `id`, `title`, `tags` or `year`
    /// is missing or has the wrong JSON type.
    pub fn from_row(row: &RawRow) -> Result<Self, String> {
        let map = &FIELD_MAP;

        Ok(Self {
            id: required_id(row, map.id)?,
            title: required_text(row, "title", map.title)?,
            tags: required_text(row, "tags", map.tags)?,
            year: required_text(row, "year", map.year)?,
            client_name: optional_text(row, map.client_name),
            description: optional_text(row, map.description),
            image_ref: optional_text(row, map.image_ref),
            gallery_refs: string_sequence(row, map.gallery_refs),
        })
    }
}

fn lookup<'a>(row: &'a RawRow, spellings: &[&str]) -> Option<&'a Value> {
    spellings
        .iter()
        .filter_map(|name| row.get(*name))
        .find(|value| !value.is_null())
}

/// The row's identifier under the same rules `from_row` applies, if any.
pub fn row_id(row: &RawRow) -> Option<i64> {
    required_id(row, FIELD_MAP.id).ok()
}

fn required_id(row: &RawRow, spellings: &[&str]) -> Result<i64, String> {
    match lookup(row, spellings) {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| format!("column 'id' is not an integer: {}", n)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("column 'id' is not an integer: {}", s)),
        Some(other) => Err(format!("column 'id' has unexpected type: {}", other)),
        None => Err("column 'id' is missing".to_string()),
    }
}

fn required_text(row: &RawRow, field: &str, spellings: &[&str]) -> Result<String, String> {
    match lookup(row, spellings) {
        Some(Value::String(s)) => Ok(s.clone()),
        // Years are sometimes stored as integers.
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(format!("column '{}' has unexpected type: {}", field, other)),
        None => Err(format!("column '{}' is missing", field)),
    }
}

fn optional_text(row: &RawRow, spellings: &[&str]) -> Option<String> {
    spellings
        .iter()
        .filter_map(|name| row.get(*name))
        .filter_map(Value::as_str)
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn string_sequence(row: &RawRow, spellings: &[&str]) -> Option<Vec<String>> {
    let items = lookup(row, spellings)?.as_array()?;
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> RawRow {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_from_row_snake_case() {
        let record = ProjectRecord::from_row(&row(json!({
            "id": 1,
            "title": "Sharlee",
            "tags": "Branding",
            "year": "2024",
            "client_name": "Acme",
            "description": "A brand refresh",
            "image_url": "a.jpg",
            "gallery_images": ["b.jpg", "c.jpg"]
        })))
        .unwrap();

        assert_eq!(record.id, 1);
        assert_eq!(record.title, "Sharlee");
        assert_eq!(record.client_name.as_deref(), Some("Acme"));
        assert_eq!(record.description.as_deref(), Some("A brand refresh"));
        assert_eq!(record.image_ref.as_deref(), Some("a.jpg"));
        assert_eq!(
            record.gallery_refs,
            Some(vec!["b.jpg".to_string(), "c.jpg".to_string()])
        );
    }

    #[test]
    fn test_image_aliases_map_to_same_field() {
        for column in FIELD_MAP.image_ref {
            let mut raw = row(json!({ "id": 2, "title": "t", "tags": "x", "year": "2023" }));
            raw.insert(column.to_string(), json!("cover.png"));
            let record = ProjectRecord::from_row(&raw).unwrap();
            assert_eq!(
                record.image_ref.as_deref(),
                Some("cover.png"),
                "alias '{}' should map to image_ref",
                column
            );
        }
    }

    #[test]
    fn test_gallery_aliases_map_to_same_field() {
        for column in FIELD_MAP.gallery_refs {
            let mut raw = row(json!({ "id": 2, "title": "t", "tags": "x", "year": "2023" }));
            raw.insert(column.to_string(), json!(["one.png"]));
            let record = ProjectRecord::from_row(&raw).unwrap();
            assert_eq!(record.gallery_refs, Some(vec!["one.png".to_string()]));
        }
    }

    #[test]
    fn test_null_empty_and_missing_image_are_absent() {
        let variants = vec![
            json!({ "id": 3, "title": "t", "tags": "x", "year": "2022" }),
            json!({ "id": 3, "title": "t", "tags": "x", "year": "2022", "image_url": null }),
            json!({ "id": 3, "title": "t", "tags": "x", "year": "2022", "image_url": "" }),
            json!({ "id": 3, "title": "t", "tags": "x", "year": "2022", "imageUrl": "   " }),
        ];

        for variant in variants {
            let record = ProjectRecord::from_row(&row(variant.clone())).unwrap();
            assert_eq!(record.image_ref, None, "expected absent image for {}", variant);
        }
    }

    #[test]
    fn test_first_non_null_spelling_wins() {
        let record = ProjectRecord::from_row(&row(json!({
            "id": 4, "title": "t", "tags": "x", "year": "2022",
            "image_url": null,
            "imageUrl": "camel.jpg",
            "main_image": "legacy.jpg"
        })))
        .unwrap();
        assert_eq!(record.image_ref.as_deref(), Some("camel.jpg"));
    }

    #[test]
    fn test_improper_gallery_is_absent() {
        let variants = vec![
            json!("b.jpg"),
            json!({ "0": "b.jpg" }),
            json!(["b.jpg", 7]),
            json!(null),
        ];

        for gallery in variants {
            let mut raw = row(json!({ "id": 5, "title": "t", "tags": "x", "year": "2022" }));
            raw.insert("gallery_images".to_string(), gallery.clone());
            let record = ProjectRecord::from_row(&raw).unwrap();
            assert_eq!(record.gallery_refs, None, "expected no gallery for {}", gallery);
        }
    }

    #[test]
    fn test_numeric_year_and_string_id_accepted() {
        let record = ProjectRecord::from_row(&row(json!({
            "id": "12", "title": "t", "tags": "x", "year": 2021
        })))
        .unwrap();
        assert_eq!(record.id, 12);
        assert_eq!(record.year, "2021");
    }

    #[test]
    fn test_row_id_accepts_numbers_and_numeric_strings() {
        assert_eq!(row_id(&row(json!({ "id": 8 }))), Some(8));
        assert_eq!(row_id(&row(json!({ "id": " 9 " }))), Some(9));
        assert_eq!(row_id(&row(json!({ "id": "nine" }))), None);
        assert_eq!(row_id(&row(json!({ "title": "t" }))), None);
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let err = ProjectRecord::from_row(&row(json!({ "id": 6, "tags": "x", "year": "2022" })))
            .unwrap_err();
        assert!(err.contains("title"), "error should name the field, got: {}", err);

        let err = ProjectRecord::from_row(&row(json!({ "title": "t", "tags": "x", "year": "2022" })))
            .unwrap_err();
        assert!(err.contains("id"), "error should name the field, got: {}", err);
    }
}
