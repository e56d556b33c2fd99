//! Idempotent DDL for the products table and its two indexes.

use sqlx::PgPool;

use crate::database::manager::DatabaseError;

pub const PRODUCTS_TABLE: &str = "products";

/// Statements applied in order; each is safe to re-run.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS "products" (
        "id" BIGSERIAL PRIMARY KEY,
        "fields" JSONB NOT NULL DEFAULT '{}'::jsonb,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT "products_fields_object" CHECK (jsonb_typeof("fields") = 'object'),
        CONSTRAINT "products_timestamps_ordered" CHECK ("created_at" <= "updated_at")
    )"#,
    // General-purpose index over the whole document
    r#"CREATE INDEX IF NOT EXISTS "products_fields_gin" ON "products" USING GIN ("fields")"#,
    // Targeted index over the text-extracted price
    r#"CREATE INDEX IF NOT EXISTS "products_price_idx" ON "products" (("fields" ->> 'price'))"#,
];

pub async fn apply(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("Failed to apply schema: {}", e)))?;
    }
    tracing::info!("Schema applied for table '{}'", PRODUCTS_TABLE);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_is_idempotent() {
        for statement in SCHEMA_STATEMENTS {
            assert!(statement.contains("IF NOT EXISTS"), "not idempotent: {}", statement);
        }
    }
}
