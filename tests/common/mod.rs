#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use product_catalog_api::config::AppConfig;
use product_catalog_api::database::{schema, DatabaseManager, MemoryProductRepository, PgProductRepository};
use product_catalog_api::middleware::ProductStore;
use product_catalog_api::server;
use reqwest::StatusCode;
use serde_json::{Map, Value};

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Start a server with a fresh in-memory store on the current runtime
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        let store = ProductStore::new(MemoryProductRepository::new());
        let app = server::app(store, &AppConfig::development());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self {
            port,
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /products/ and return the created record (`data`)
    pub async fn create(&self, body: Value) -> Result<Value> {
        let res = self.client.post(self.url("/products/")).json(&body).send().await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
        let payload = res.json::<Value>().await?;
        Ok(payload["data"].clone())
    }

    /// GET /products/?<query> and return the whole envelope
    pub async fn list(&self, query: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url(&format!("/products/?{}", query))).send().await?;
        let status = res.status();
        Ok((status, res.json::<Value>().await?))
    }
}

/// Prices of the records in a list envelope, in response order
pub fn prices(payload: &Value) -> Vec<f64> {
    payload["data"]
        .as_array()
        .map(|records| records.iter().filter_map(|r| r["fields"]["price"].as_f64()).collect())
        .unwrap_or_default()
}

/// PostgreSQL store with the schema applied, or `None` when `DATABASE_URL` is unset
pub async fn pg_store() -> Result<Option<PgProductRepository>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL store test");
        return Ok(None);
    };
    let pool = DatabaseManager::connect(&url, &AppConfig::development().database).await?;
    schema::apply(&pool).await?;
    Ok(Some(PgProductRepository::new(pool, false)))
}

/// Name suffix unique to one test run so parallel tests share the table safely
pub fn unique_tag(label: &str) -> String {
    format!("{}-{}", label, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

pub fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}
