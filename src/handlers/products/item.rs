use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    Json,
};
use serde_json::Value;

use crate::api::fields_document;
use crate::database::Product;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ProductStore};

/// Ids that are not integers cannot exist, so they are reported as missing.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::not_found(format!("Product {} not found", raw)))
}

/// GET /products/:id/
pub async fn get(
    Extension(store): Extension<ProductStore>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    let id = parse_id(&id)?;
    let product = store.get(id).await?;
    Ok(ApiResponse::success(product, "Product retrieved successfully"))
}

/// PUT /products/:id/ - merge the supplied keys into the stored document
pub async fn put(
    Extension(store): Extension<ProductStore>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Product> {
    let id = parse_id(&id)?;
    let Json(payload) = body.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let changes = fields_document(payload)?;

    let product = store.merge(id, changes).await?;
    tracing::info!("Updated product {}", product.id);
    Ok(ApiResponse::success(product, "Product updated successfully"))
}

/// DELETE /products/:id/
pub async fn delete(
    Extension(store): Extension<ProductStore>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id)?;
    store.delete(id).await?;
    tracing::info!("Deleted product {}", id);
    Ok(ApiResponse::no_content())
}
