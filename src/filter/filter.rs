use crate::config::PaginationConfig;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{ListParams, Pagination, ProductFilter, SqlResult};

/// Columns returned for every product query.
const PRODUCT_COLUMNS: &str = "\"id\", \"fields\", \"created_at\", \"updated_at\"";

impl ProductFilter {
    /// Validate raw list parameters. Empty values count as absent.
    pub fn from_params(params: &ListParams, config: &PaginationConfig) -> Result<Self, FilterError> {
        let name = params.name.clone().filter(|v| !v.is_empty());
        let price_gte = present(&params.price_gte)
            .map(|v| parse_price("price_gte", v))
            .transpose()?;
        let price_lte = present(&params.price_lte)
            .map(|v| parse_price("price_lte", v))
            .transpose()?;
        let sort = FilterOrder::parse(present(&params.order), present(&params.sort_by));

        let page = present(&params.page)
            .map(|v| parse_positive("page", v))
            .transpose()?
            .unwrap_or(1);
        let requested_limit = present(&params.limit)
            .map(|v| parse_positive("limit", v))
            .transpose()?
            .unwrap_or(config.default_limit);

        let limit = match config.max_limit {
            Some(max) if requested_limit > max => {
                tracing::warn!("Limit {} exceeds max {}, capping to max", requested_limit, max);
                max
            }
            _ => requested_limit,
        };

        Ok(Self {
            name,
            price_gte,
            price_lte,
            sort,
            pagination: Pagination { page, limit },
        })
    }
}

/// Numeric params tolerate surrounding whitespace; blank means absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(param: &'static str, raw: &str) -> Result<f64, FilterError> {
    let value: f64 = raw.parse().map_err(|_| FilterError::NotANumber { param })?;
    if !value.is_finite() {
        return Err(FilterError::NotANumber { param });
    }
    if value < 0.0 {
        return Err(FilterError::Negative { param });
    }
    Ok(value)
}

fn parse_positive(param: &'static str, raw: &str) -> Result<u32, FilterError> {
    match raw.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(FilterError::NotPositiveInteger { param }),
    }
}

/// SQL generation for a validated [`ProductFilter`] against one table.
pub struct Filter<'a> {
    table_name: &'a str,
    filter: &'a ProductFilter,
}

impl<'a> Filter<'a> {
    pub fn new(table_name: &'a str, filter: &'a ProductFilter) -> Self {
        Self { table_name, filter }
    }

    pub fn to_sql(&self) -> SqlResult {
        let where_result = self.to_where_sql();
        let order_clause = FilterOrder::generate(self.filter.sort);
        let limit_clause = format!(
            "LIMIT {} OFFSET {}",
            self.filter.pagination.limit,
            self.filter.pagination.offset()
        );

        let query = [
            format!("SELECT {}", PRODUCT_COLUMNS),
            format!("FROM \"{}\"", self.table_name),
            where_keyword(&where_result.query),
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params: where_result.params }
    }

    pub fn to_where_sql(&self) -> SqlResult {
        let (query, params) = FilterWhere::generate(self.filter, 0);
        SqlResult { query, params }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        let where_result = self.to_where_sql();
        let query = [
            "SELECT COUNT(*) AS count".to_string(),
            format!("FROM \"{}\"", self.table_name),
            where_keyword(&where_result.query),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
        SqlResult { query, params: where_result.params }
    }
}

fn where_keyword(conditions: &str) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions)
    }
}
