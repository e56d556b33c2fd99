mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn page_zero_is_rejected() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let (status, payload) = server.list("page=0").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["status"], 400);
    assert_eq!(payload["errors"]["page"], "not_a_positive_integer");
    assert!(payload["message"].as_str().unwrap_or("").contains("page"), "{}", payload);

    Ok(())
}

#[tokio::test]
async fn invalid_limit_names_the_parameter() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let (status, payload) = server.list("limit=ten").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["errors"]["limit"], "not_a_positive_integer");

    Ok(())
}

#[tokio::test]
async fn price_errors_distinguish_not_a_number_from_negative() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let (status, payload) = server.list("price_gte=abc").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["code"], "VALIDATION_ERROR");
    assert_eq!(payload["errors"]["price_gte"], "not_a_number");

    let (status, payload) = server.list("price_gte=-5").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["errors"]["price_gte"], "negative");

    let (status, payload) = server.list("price_lte=-0.5").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["errors"]["price_lte"], "negative");

    Ok(())
}

#[tokio::test]
async fn non_object_body_is_rejected() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/products/"))
        .json(&json!(["not", "an", "object"]))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], "INVALID_JSON");

    let res = server
        .client
        .post(server.url("/products/"))
        .json(&json!({"fields": "nope"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn non_integer_id_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.client.get(server.url("/products/abc/")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?["status"], 404);

    Ok(())
}
