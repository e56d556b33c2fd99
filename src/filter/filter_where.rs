use serde_json::Value;

use super::types::ProductFilter;

/// JSON path expressions used by the list filters. `fields ->> 'name'` is the
/// text projection; `fields -> 'price'` stays JSONB so comparisons never fail on
/// records whose price is not numeric.
const NAME_TEXT: &str = "\"fields\" ->> 'name'";
const PRICE_JSON: &str = "\"fields\" -> 'price'";

pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
    conditions: Vec<String>,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
            conditions: vec![],
        }
    }

    /// Build the conjunctive WHERE body (without the keyword) and its bound params.
    /// Returns an empty string when no filter applies.
    pub fn generate(filter: &ProductFilter, starting_param_index: usize) -> (String, Vec<Value>) {
        Self::new(starting_param_index).build(filter)
    }

    fn build(mut self, filter: &ProductFilter) -> (String, Vec<Value>) {
        if let Some(name) = &filter.name {
            let pattern = format!("%{}%", escape_like(name));
            let placeholder = self.param(Value::String(pattern));
            self.conditions.push(format!("{} ILIKE {}", NAME_TEXT, placeholder));
        }

        if filter.price_gte.is_some() || filter.price_lte.is_some() {
            self.conditions.push(format!("jsonb_typeof({}) = 'number'", PRICE_JSON));
        }
        if let Some(min) = filter.price_gte {
            let placeholder = self.param(number(min));
            self.conditions.push(format!("{} >= to_jsonb({}::float8)", PRICE_JSON, placeholder));
        }
        if let Some(max) = filter.price_lte {
            let placeholder = self.param(number(max));
            self.conditions.push(format!("{} <= to_jsonb({}::float8)", PRICE_JSON, placeholder));
        }

        (self.conditions.join(" AND "), self.param_values)
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

/// Sort key for price ordering; non-numeric and missing prices become NULL.
pub fn price_sort_key() -> String {
    format!(
        "CASE WHEN jsonb_typeof({price}) = 'number' THEN {price} END",
        price = PRICE_JSON
    )
}

/// Escape LIKE metacharacters so user input matches literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn number(value: f64) -> Value {
    // Bounds are validated finite before they reach here
    serde_json::Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}
