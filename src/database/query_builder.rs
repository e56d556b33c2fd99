use serde_json::Value;
use sqlx::{self, postgres::PgArguments, FromRow, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::filter::{Filter, ProductFilter, SqlResult};

/// Runs filter-generated SQL against a table, binding positional parameters.
pub struct QueryBuilder<'a, T> {
    table_name: &'a str,
    query_logging: bool,
    _phantom: std::marker::PhantomData<T>,
}

impl<'a, T> QueryBuilder<'a, T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    pub fn new(table_name: &'a str, query_logging: bool) -> Self {
        Self {
            table_name,
            query_logging,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_page(&self, filter: &ProductFilter, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = Filter::new(self.table_name, filter).to_sql();
        self.log(&sql_result);
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(pool).await?;
        Ok(rows)
    }

    pub async fn count(&self, filter: &ProductFilter, pool: &PgPool) -> Result<i64, DatabaseError> {
        let sql_result = Filter::new(self.table_name, filter).to_count_sql();
        self.log(&sql_result);
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    fn log(&self, sql_result: &SqlResult) {
        if self.query_logging {
            tracing::debug!("SQL: {} params={:?}", sql_result.query, sql_result.params);
        }
    }
}

// Filter params are either LIKE patterns or finite price bounds.
fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::String(s) => q.bind(s.as_str()),
        other => q.bind(other.as_f64()),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Value::String(s) => q.bind(s.as_str()),
        other => q.bind(other.as_f64()),
    }
}
