use super::filter_where::price_sort_key;
use super::types::SortDirection;

pub struct FilterOrder;

impl FilterOrder {
    /// Resolve the sort from `order` first, then `sort_by`. Unknown values mean
    /// "no explicit sort" rather than an error.
    pub fn parse(order: Option<&str>, sort_by: Option<&str>) -> Option<SortDirection> {
        order
            .and_then(SortDirection::from_order)
            .or_else(|| sort_by.and_then(SortDirection::from_sort_by))
    }

    /// Records without a numeric price go last in both directions; `id` breaks ties
    /// and is the insertion order used when no sort is requested.
    pub fn generate(sort: Option<SortDirection>) -> String {
        match sort {
            Some(direction) => format!(
                "ORDER BY {} {} NULLS LAST, \"id\" ASC",
                price_sort_key(),
                direction.to_sql()
            ),
            None => "ORDER BY \"id\" ASC".to_string(),
        }
    }
}
