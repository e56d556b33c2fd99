mod common;

use anyhow::Result;
use product_catalog_api::database::{schema, DatabaseError, Product, ProductRepository};
use product_catalog_api::filter::{ProductFilter, SortDirection};
use serde_json::{json, Value};

use common::fields;

// These run only when DATABASE_URL points at a PostgreSQL server. Each test tags
// its records with a unique name and filters on it, so runs can share the table.

async fn seed_mixed_prices(repo: &impl ProductRepository, tag: &str) -> Result<()> {
    for price in [json!(5), json!(15), json!(25), json!(10.5), json!("12")] {
        repo.create(fields(json!({"name": format!("Item {}", tag), "price": price}))).await?;
    }
    repo.create(fields(json!({"name": format!("Item {}", tag)}))).await?;
    Ok(())
}

fn tagged(tag: &str) -> ProductFilter {
    ProductFilter {
        name: Some(tag.to_string()),
        ..Default::default()
    }
}

fn price_values(records: &[Product]) -> Vec<Value> {
    records
        .iter()
        .map(|p| p.fields.get("price").cloned().unwrap_or(Value::Null))
        .collect()
}

#[tokio::test]
async fn schema_apply_is_idempotent() -> Result<()> {
    let Some(repo) = common::pg_store().await? else { return Ok(()) };

    schema::apply(repo.pool()).await?;
    schema::apply(repo.pool()).await?;

    let indexes: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pg_indexes WHERE tablename = 'products' \
         AND indexname IN ('products_fields_gin', 'products_price_idx')",
    )
    .fetch_one(repo.pool())
    .await?;
    assert_eq!(indexes, 2);

    Ok(())
}

#[tokio::test]
async fn price_bounds_are_inclusive_and_skip_non_numeric() -> Result<()> {
    let Some(repo) = common::pg_store().await? else { return Ok(()) };
    let tag = common::unique_tag("range");
    seed_mixed_prices(&repo, &tag).await?;

    let page = repo
        .list(&ProductFilter {
            price_gte: Some(10.0),
            price_lte: Some(20.0),
            ..tagged(&tag)
        })
        .await?;
    assert_eq!(page.total, 2);
    assert_eq!(price_values(&page.records), vec![json!(15), json!(10.5)]);

    let page = repo
        .list(&ProductFilter {
            price_gte: Some(15.0),
            price_lte: Some(25.0),
            ..tagged(&tag)
        })
        .await?;
    assert_eq!(price_values(&page.records), vec![json!(15), json!(25)]);

    Ok(())
}

#[tokio::test]
async fn price_sort_puts_non_numeric_last_in_both_directions() -> Result<()> {
    let Some(repo) = common::pg_store().await? else { return Ok(()) };
    let tag = common::unique_tag("sort");
    seed_mixed_prices(&repo, &tag).await?;

    let desc = repo
        .list(&ProductFilter { sort: Some(SortDirection::Desc), ..tagged(&tag) })
        .await?;
    assert_eq!(
        price_values(&desc.records),
        vec![json!(25), json!(15), json!(10.5), json!(5), json!("12"), Value::Null]
    );

    let asc = repo
        .list(&ProductFilter { sort: Some(SortDirection::Asc), ..tagged(&tag) })
        .await?;
    assert_eq!(
        price_values(&asc.records),
        vec![json!(5), json!(10.5), json!(15), json!(25), json!("12"), Value::Null]
    );

    Ok(())
}

#[tokio::test]
async fn name_filter_matches_like_metacharacters_literally() -> Result<()> {
    let Some(repo) = common::pg_store().await? else { return Ok(()) };
    let tag = common::unique_tag("like");
    repo.create(fields(json!({"name": format!("50% off {}", tag)}))).await?;
    repo.create(fields(json!({"name": format!("500 OFF {}", tag)}))).await?;

    let page = repo.list(&tagged(&format!("50% off {}", tag))).await?;
    assert_eq!(page.total, 1);
    assert_eq!(page.records[0].name_text(), Some(format!("50% off {}", tag)));

    // Case-insensitive substring still matches both
    let page = repo.list(&tagged(&format!("off {}", tag.to_uppercase()))).await?;
    assert_eq!(page.total, 2);

    Ok(())
}

#[tokio::test]
async fn merge_keeps_other_keys_and_advances_updated_at() -> Result<()> {
    let Some(repo) = common::pg_store().await? else { return Ok(()) };
    let created = repo
        .create(fields(json!({"name": "Rug", "price": 80, "color": "blue"})))
        .await?;
    assert_eq!(created.created_at, created.updated_at);

    let updated = repo
        .merge(created.id, fields(json!({"price": 70, "material": "wool"})))
        .await?;
    assert_eq!(
        Value::Object(updated.fields.clone()),
        json!({"name": "Rug", "price": 70, "color": "blue", "material": "wool"})
    );
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    let again = repo.merge(created.id, fields(json!({"price": 65}))).await?;
    assert!(again.updated_at > updated.updated_at);

    Ok(())
}

#[tokio::test]
async fn delete_then_get_is_not_found() -> Result<()> {
    let Some(repo) = common::pg_store().await? else { return Ok(()) };
    let created = repo.create(fields(json!({"name": "Stool"}))).await?;

    repo.delete(created.id).await?;
    assert!(matches!(repo.get(created.id).await, Err(DatabaseError::NotFound(_))));
    assert!(matches!(repo.delete(created.id).await, Err(DatabaseError::NotFound(_))));
    assert!(matches!(
        repo.merge(created.id, fields(json!({"price": 1}))).await,
        Err(DatabaseError::NotFound(_))
    ));

    Ok(())
}
