use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::middleware::ProductStore;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "status": 200,
        "message": "Product Catalog API",
        "data": {
            "name": "Product Catalog API",
            "version": version,
            "endpoints": {
                "products": "/products/ (GET list, POST create)",
                "product": "/products/:id/ (GET, PUT merge, DELETE)",
                "health": "/health",
            }
        }
    }))
}

/// GET /health - store connectivity
pub async fn health(Extension(store): Extension<ProductStore>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": 200,
                "message": "ok",
                "data": {
                    "timestamp": now,
                    "store": store.backend(),
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": 503,
                    "message": "database unavailable",
                    "data": {
                        "timestamp": now,
                        "store": store.backend(),
                        "database": "degraded"
                    }
                })),
            )
        }
    }
}
