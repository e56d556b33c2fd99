use serde::{Deserialize, Serialize};

/// Raw list query parameters as they arrive on `GET /products/`.
///
/// Every value is kept as a string so that validation can name the offending
/// parameter instead of failing inside the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
    pub price_gte: Option<String>,
    pub price_lte: Option<String>,
    pub order: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Builds params from decoded query pairs. A repeated key keeps its last value;
/// unknown keys are ignored.
impl FromIterator<(String, String)> for ListParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut params.name,
                "price_gte" => &mut params.price_gte,
                "price_lte" => &mut params.price_lte,
                "order" => &mut params.order,
                "sort_by" => &mut params.sort_by,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            *slot = Some(value);
        }
        params
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// `order=asc|desc`
    pub fn from_order(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    /// `sort_by=price|-price`
    pub fn from_sort_by(value: &str) -> Option<Self> {
        match value {
            "price" => Some(SortDirection::Asc),
            "-price" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    /// ceil(total / limit)
    pub fn total_pages(&self, total: i64) -> i64 {
        let limit = i64::from(self.limit);
        (total + limit - 1) / limit
    }
}

/// Validated list query: conjunctive filters, optional price sort and a page window.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub price_gte: Option<f64>,
    pub price_lte: Option<f64>,
    pub sort: Option<SortDirection>,
    pub pagination: Pagination,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            name: None,
            price_gte: None,
            price_lte: None,
            sort: None,
            pagination: Pagination { page: 1, limit: 10 },
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<serde_json::Value>,
}
