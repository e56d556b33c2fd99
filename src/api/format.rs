use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::filter::Pagination;

/// `metadata` section of a list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl PageMetadata {
    pub fn new(pagination: Pagination, total: i64) -> Self {
        Self {
            page: pagination.page,
            limit: pagination.limit,
            total,
            total_pages: pagination.total_pages(total),
        }
    }
}

/// Resolve the `fields` document from a request body.
///
/// `{"fields": {...}}` selects the nested object; any other object is used whole.
pub fn fields_document(body: Value) -> Result<Map<String, Value>, ApiError> {
    let Value::Object(mut map) = body else {
        return Err(ApiError::invalid_json("Request body must be a JSON object"));
    };

    match map.remove("fields") {
        Some(Value::Object(fields)) => Ok(fields),
        Some(_) => Err(ApiError::invalid_json("'fields' must be a JSON object")),
        None => Ok(map),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_reports_page_count() {
        let metadata = PageMetadata::new(Pagination { page: 3, limit: 10 }, 25);
        assert_eq!(
            metadata,
            PageMetadata { page: 3, limit: 10, total: 25, total_pages: 3 }
        );
    }

    #[test]
    fn nested_fields_object_is_unwrapped() {
        let fields = fields_document(json!({"fields": {"name": "Lamp", "price": 10}})).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["name"], "Lamp");
    }

    #[test]
    fn top_level_object_is_used_whole() {
        let fields = fields_document(json!({"name": "Lamp", "tags": ["a"]})).unwrap();
        assert_eq!(fields["tags"], json!(["a"]));
    }

    #[test]
    fn non_objects_are_rejected() {
        for body in [json!([1, 2]), json!("lamp"), json!({"fields": 5})] {
            let err = fields_document(body).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_JSON");
        }
    }
}
