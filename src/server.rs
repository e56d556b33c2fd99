use axum::{extract::DefaultBodyLimit, routing::get, Extension, Router};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers::{products, system};
use crate::middleware::ProductStore;

pub fn app(store: ProductStore, config: &AppConfig) -> Router {
    let router = Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(product_routes())
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(Extension(store))
        .layer(Extension(config.pagination.clone()))
        .layer(TraceLayer::new_for_http());

    if config.security.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

fn product_routes() -> Router {
    Router::new()
        // Collection (list / create)
        .route("/products", get(products::products_get).post(products::products_post))
        .route("/products/", get(products::products_get).post(products::products_post))
        // Item (retrieve / merge update / delete)
        .route(
            "/products/:id",
            get(products::product_get)
                .put(products::product_put)
                .delete(products::product_delete),
        )
        .route(
            "/products/:id/",
            get(products::product_get)
                .put(products::product_put)
                .delete(products::product_delete),
        )
}

/// Serve until SIGINT/SIGTERM, then drain in-flight requests
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
