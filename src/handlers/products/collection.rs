use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query,
    },
    Json,
};
use serde_json::Value;

use crate::api::{fields_document, PageMetadata};
use crate::config::PaginationConfig;
use crate::database::Product;
use crate::error::ApiError;
use crate::filter::{ListParams, ProductFilter};
use crate::middleware::{ApiResponse, ApiResult, ProductStore};

/// GET /products/ - filtered, sorted, paginated listing
pub async fn list(
    Extension(store): Extension<ProductStore>,
    Extension(pagination): Extension<PaginationConfig>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Vec<Product>> {
    let Query(pairs) = query.map_err(|e| ApiError::validation_error(e.body_text(), None))?;
    let params: ListParams = pairs.into_iter().collect();
    let filter = ProductFilter::from_params(&params, &pagination)?;
    let page = store.list(&filter).await?;

    let metadata = PageMetadata::new(filter.pagination, page.total);
    Ok(ApiResponse::success(page.records, "Products retrieved successfully").with_metadata(metadata))
}

/// POST /products/ - create a product from a JSON document
pub async fn create(
    Extension(store): Extension<ProductStore>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Product> {
    let Json(payload) = body.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let fields = fields_document(payload)?;

    let product = store.create(fields).await?;
    tracing::info!("Created product {}", product.id);
    Ok(ApiResponse::created(product, "Product created successfully"))
}
