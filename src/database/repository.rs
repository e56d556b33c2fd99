use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Product, ProductRow};
use crate::database::query_builder::QueryBuilder;
use crate::database::schema::PRODUCTS_TABLE;
use crate::filter::ProductFilter;

/// One page of a filtered listing plus the unpaginated match count.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub records: Vec<Product>,
    pub total: i64,
}

/// Storage operations behind the product endpoints.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self, filter: &ProductFilter) -> Result<ProductPage, DatabaseError>;

    async fn get(&self, id: i64) -> Result<Product, DatabaseError>;

    /// Insert a record; `created_at` and `updated_at` are assigned the same instant.
    async fn create(&self, fields: Map<String, Value>) -> Result<Product, DatabaseError>;

    /// Shallow merge of `changes` into the stored document, refreshing `updated_at`.
    async fn merge(&self, id: i64, changes: Map<String, Value>) -> Result<Product, DatabaseError>;

    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    fn backend(&self) -> &'static str;
}

pub(crate) fn not_found(id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("Product {} not found", id))
}

const RETURNING: &str = "RETURNING \"id\", \"fields\", \"created_at\", \"updated_at\"";

pub struct PgProductRepository {
    pool: PgPool,
    query_logging: bool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool, query_logging: bool) -> Self {
        Self { pool, query_logging }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn builder(&self) -> QueryBuilder<'static, ProductRow> {
        QueryBuilder::new(PRODUCTS_TABLE, self.query_logging)
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self, filter: &ProductFilter) -> Result<ProductPage, DatabaseError> {
        let builder = self.builder();
        let total = builder.count(filter, &self.pool).await?;
        let rows = builder.select_page(filter, &self.pool).await?;
        Ok(ProductPage {
            records: rows.into_iter().map(Product::from).collect(),
            total,
        })
    }

    async fn get(&self, id: i64) -> Result<Product, DatabaseError> {
        let sql = format!(
            "SELECT \"id\", \"fields\", \"created_at\", \"updated_at\" FROM \"{}\" WHERE \"id\" = $1",
            PRODUCTS_TABLE
        );
        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Product::from)
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, fields: Map<String, Value>) -> Result<Product, DatabaseError> {
        let sql = format!(
            "INSERT INTO \"{}\" (\"fields\", \"created_at\", \"updated_at\") VALUES ($1::jsonb, NOW(), NOW()) {}",
            PRODUCTS_TABLE, RETURNING
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(Json(&fields))
            .fetch_one(&self.pool)
            .await?;
        tracing::debug!("Created product {}", row.id);
        Ok(row.into())
    }

    async fn merge(&self, id: i64, changes: Map<String, Value>) -> Result<Product, DatabaseError> {
        // `||` on two JSONB objects is a shallow key-by-key merge, right side wins
        let sql = format!(
            "UPDATE \"{}\" SET \"fields\" = \"fields\" || $1::jsonb, \
             \"updated_at\" = GREATEST(NOW(), \"updated_at\" + INTERVAL '1 microsecond') \
             WHERE \"id\" = $2 {}",
            PRODUCTS_TABLE, RETURNING
        );
        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(Json(&changes))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Product::from)
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM \"{}\" WHERE \"id\" = $1", PRODUCTS_TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
