mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

fn record(message_id: &str, short_code: &str) -> serde_json::Value {
    json!({
        "messageId": message_id,
        "body": json!({ "shortCode": short_code, "timestamp": 1_700_000_000_000_i64 }).to_string(),
        "attributes": { "ApproximateReceiveCount": "1" }
    })
}

#[tokio::test]
async fn test_batch_all_counted() {
    let (state, repo) = common::create_test_state();
    common::seed_mapping(&repo, "abc123", "https://example.com/a").await;
    common::seed_mapping(&repo, "xyz789", "https://example.com/b").await;

    let server = TestServer::new(common::visits_app(state)).unwrap();

    let response = server
        .post("/visits/batch")
        .json(&json!({
            "Records": [
                record("m1", "abc123"),
                record("m2", "abc123"),
                record("m3", "xyz789"),
            ]
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "batchItemFailures": [] })
    );

    assert_eq!(repo.get("abc123").await.unwrap().visit_count, 2);
    assert_eq!(repo.get("xyz789").await.unwrap().visit_count, 1);
}

#[tokio::test]
async fn test_batch_reports_only_the_missing_code() {
    let (state, repo) = common::create_test_state();
    for code in ["code01", "code02", "code04", "code05"] {
        common::seed_mapping(&repo, code, "https://example.com").await;
    }

    let server = TestServer::new(common::visits_app(state)).unwrap();

    let response = server
        .post("/visits/batch")
        .json(&json!({
            "Records": [
                record("m1", "code01"),
                record("m2", "code02"),
                record("m3", "code03"),
                record("m4", "code04"),
                record("m5", "code05"),
            ]
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "batchItemFailures": [ { "itemIdentifier": "m3" } ] })
    );

    for code in ["code01", "code02", "code04", "code05"] {
        assert_eq!(repo.get(code).await.unwrap().visit_count, 1);
    }
    assert!(repo.get("code03").await.is_none());
}

#[tokio::test]
async fn test_batch_malformed_body_fails_only_that_message() {
    let (state, repo) = common::create_test_state();
    common::seed_mapping(&repo, "abc123", "https://example.com").await;

    let server = TestServer::new(common::visits_app(state)).unwrap();

    let response = server
        .post("/visits/batch")
        .json(&json!({
            "Records": [
                { "messageId": "bad", "body": "not json" },
                record("good", "abc123"),
            ]
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>()["batchItemFailures"],
        json!([ { "itemIdentifier": "bad" } ])
    );
    assert_eq!(repo.get("abc123").await.unwrap().visit_count, 1);
}

#[tokio::test]
async fn test_batch_last_delivery_is_dead_lettered() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(common::visits_app(state)).unwrap();

    let response = server
        .post("/visits/batch")
        .json(&json!({
            "Records": [
                {
                    "messageId": "m1",
                    "body": "{\"shortCode\":\"gone00\"}",
                    "attributes": { "ApproximateReceiveCount": "5" }
                }
            ]
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "batchItemFailures": [] })
    );
}

#[tokio::test]
async fn test_envelope_without_records_is_empty_batch() {
    let (state, repo) = common::create_test_state();
    let server = TestServer::new(common::visits_app(state)).unwrap();

    let response = server.post("/visits/batch").json(&json!({})).await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "batchItemFailures": [] })
    );
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_malformed_envelope_fails_batch() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(common::visits_app(state)).unwrap();

    let response = server.post("/visits/batch").text("{\"Records\": 42}").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "error": "Internal server error" })
    );
}

#[tokio::test]
async fn test_store_outage_fails_every_message() {
    let state = common::build_state(
        std::sync::Arc::new(common::UnavailableRepository),
        std::sync::Arc::new(common::FixedCodeGenerator("AAAAAA")),
        url_minter::api::middleware::cors::CorsPolicy::permissive(),
    );
    let server = TestServer::new(common::visits_app(state)).unwrap();

    let response = server
        .post("/visits/batch")
        .json(&json!({ "Records": [record("m1", "abc123"), record("m2", "xyz789")] }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>()["batchItemFailures"],
        json!([ { "itemIdentifier": "m1" }, { "itemIdentifier": "m2" } ])
    );
}
