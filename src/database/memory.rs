//! In-process product store with the same filter, sort and merge semantics as the
//! PostgreSQL repository. Used for local runs and tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::Product;
use crate::database::repository::{not_found, ProductPage, ProductRepository};
use crate::filter::{ProductFilter, SortDirection};

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    products: BTreeMap<i64, Product>,
}

#[derive(Default)]
pub struct MemoryProductRepository {
    state: RwLock<MemoryState>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

// Stored timestamps carry microsecond precision, like TIMESTAMPTZ
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn matches(product: &Product, filter: &ProductFilter) -> bool {
    if let Some(needle) = &filter.name {
        let matched = product
            .name_text()
            .map(|name| name.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false);
        if !matched {
            return false;
        }
    }

    if filter.price_gte.is_some() || filter.price_lte.is_some() {
        let Some(price) = product.price() else {
            return false;
        };
        if filter.price_gte.is_some_and(|min| price < min) {
            return false;
        }
        if filter.price_lte.is_some_and(|max| price > max) {
            return false;
        }
    }

    true
}

fn compare_by_price(a: &Product, b: &Product, direction: SortDirection) -> Ordering {
    match (a.price(), b.price()) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            let ord = match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            ord.then(a.id.cmp(&b.id))
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn list(&self, filter: &ProductFilter) -> Result<ProductPage, DatabaseError> {
        let state = self.state.read().await;
        let mut matched: Vec<&Product> = state.products.values().filter(|p| matches(p, filter)).collect();

        if let Some(direction) = filter.sort {
            matched.sort_by(|a, b| compare_by_price(a, b, direction));
        }

        let total = matched.len() as i64;
        let offset = usize::try_from(filter.pagination.offset()).unwrap_or(usize::MAX);
        let records = matched
            .into_iter()
            .skip(offset)
            .take(filter.pagination.limit as usize)
            .cloned()
            .collect();

        Ok(ProductPage { records, total })
    }

    async fn get(&self, id: i64) -> Result<Product, DatabaseError> {
        let state = self.state.read().await;
        state.products.get(&id).cloned().ok_or_else(|| not_found(id))
    }

    async fn create(&self, fields: Map<String, Value>) -> Result<Product, DatabaseError> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let timestamp = now();
        let product = Product {
            id: state.next_id,
            fields,
            created_at: timestamp,
            updated_at: timestamp,
        };
        state.products.insert(product.id, product.clone());
        tracing::debug!("Created product {}", product.id);
        Ok(product)
    }

    async fn merge(&self, id: i64, changes: Map<String, Value>) -> Result<Product, DatabaseError> {
        let mut state = self.state.write().await;
        let product = state.products.get_mut(&id).ok_or_else(|| not_found(id))?;

        product.fields.extend(changes);
        let timestamp = now();
        product.updated_at = if timestamp > product.updated_at {
            timestamp
        } else {
            product.updated_at + Duration::microseconds(1)
        };

        Ok(product.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        state.products.remove(&id).map(|_| ()).ok_or_else(|| not_found(id))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
