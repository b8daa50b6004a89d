mod common;

use axum::http::{HeaderValue, Method, StatusCode, header};
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;
use url_minter::api::middleware::cors::CorsPolicy;
use url_minter::infrastructure::persistence::MemoryMappingRepository;

#[tokio::test]
async fn test_shorten_success() {
    let (state, repo) = common::create_test_state();
    let server = TestServer::new(common::shorten_app(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/some/long/path" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    let code = json["shortCode"].as_str().unwrap();

    assert!(common::is_alphanumeric_code(code, 6));
    assert_eq!(json["originalUrl"], "https://example.com/some/long/path");
    assert_eq!(json["shortUrl"], format!("{}/{}", common::BASE_URL, code));

    let stored = repo.get(code).await.unwrap();
    assert_eq!(stored.original_url, "https://example.com/some/long/path");
    assert_eq!(stored.visit_count, 0);
}

#[tokio::test]
async fn test_shorten_missing_url() {
    let (state, repo) = common::create_test_state();
    let server = TestServer::new(common::shorten_app(state)).unwrap();

    for body in [json!({}), json!({ "url": null }), json!({ "url": "" }), json!({ "url": 7 })] {
        let response = server.post("/shorten").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<serde_json::Value>(),
            json!({ "error": "URL is required" })
        );
    }

    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_shorten_empty_body_is_missing_url() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(common::shorten_app(state)).unwrap();

    let response = server.post("/shorten").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<serde_json::Value>()["error"], "URL is required");
}

#[tokio::test]
async fn test_shorten_invalid_json() {
    let (state, repo) = common::create_test_state();
    let server = TestServer::new(common::shorten_app(state)).unwrap();

    for body in ["{\"url\": ", "not json at all", "[\"https://example.com\"]"] {
        let response = server.post("/shorten").text(body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<serde_json::Value>(),
            json!({ "error": "Invalid JSON in request body" })
        );
    }

    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_shorten_collision_retries_with_new_code() {
    let repo = Arc::new(MemoryMappingRepository::new());
    common::seed_mapping(&repo, "AAAAAA", "https://taken.example.com").await;

    struct TwoCodes(std::sync::Mutex<Vec<&'static str>>);
    impl url_minter::utils::code_generator::CodeGenerator for TwoCodes {
        fn generate(&self) -> String {
            self.0.lock().unwrap().remove(0).to_string()
        }
    }

    let generator = Arc::new(TwoCodes(std::sync::Mutex::new(vec!["AAAAAA", "BBBBBB"])));
    let state = common::build_state(repo.clone(), generator, CorsPolicy::permissive());
    let server = TestServer::new(common::shorten_app(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/new" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["shortCode"], "BBBBBB");

    // Existing mapping untouched
    let taken = repo.get("AAAAAA").await.unwrap();
    assert_eq!(taken.original_url, "https://taken.example.com");
    assert_eq!(repo.len().await, 2);
}

#[tokio::test]
async fn test_shorten_exhaustion_returns_500() {
    let repo = Arc::new(MemoryMappingRepository::new());
    common::seed_mapping(&repo, "AAAAAA", "https://taken.example.com").await;

    let state = common::build_state(
        repo.clone(),
        Arc::new(common::FixedCodeGenerator("AAAAAA")),
        CorsPolicy::permissive(),
    );
    let server = TestServer::new(common::shorten_app(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/new" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "error": "Unable to generate unique short code" })
    );
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_shorten_store_failure_is_generic() {
    let state = common::build_state(
        Arc::new(common::UnavailableRepository),
        Arc::new(common::FixedCodeGenerator("AAAAAA")),
        CorsPolicy::permissive(),
    );
    let server = TestServer::new(common::shorten_app(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({ "error": "Internal server error" })
    );
}

#[tokio::test]
async fn test_cors_headers_on_success_and_error() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(common::shorten_app(state)).unwrap();

    let ok = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;
    let bad = server.post("/shorten").json(&json!({})).await;

    for response in [ok, bad] {
        assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), "*");
        assert_eq!(
            response.header(header::ACCESS_CONTROL_ALLOW_METHODS),
            "POST, OPTIONS"
        );
        assert_eq!(
            response.header(header::ACCESS_CONTROL_ALLOW_HEADERS),
            "Content-Type"
        );
        assert_eq!(response.header(header::CONTENT_TYPE), "application/json");
    }
}

#[tokio::test]
async fn test_preflight_returns_204_with_cors() {
    let (state, _repo) = common::create_test_state();
    let server = TestServer::new(common::shorten_app(state)).unwrap();

    let response = server.method(Method::OPTIONS, "/shorten").await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), "*");
    assert_eq!(
        response.header(header::ACCESS_CONTROL_ALLOW_METHODS),
        "POST, OPTIONS"
    );
}

#[tokio::test]
async fn test_cors_with_frontend_domain() {
    let (state, _repo) = common::create_test_state_with_cors(CorsPolicy::new(Some(
        "app.example.com".to_string(),
    )));
    let server = TestServer::new(common::shorten_app(state)).unwrap();

    let matching = server
        .post("/shorten")
        .add_header(
            header::ORIGIN,
            HeaderValue::from_static("https://app.example.com"),
        )
        .json(&json!({ "url": "https://example.com" }))
        .await;
    assert_eq!(
        matching.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        "https://app.example.com"
    );

    let foreign = server
        .post("/shorten")
        .add_header(
            header::ORIGIN,
            HeaderValue::from_static("https://evil.example.net"),
        )
        .json(&json!({ "url": "https://example.com" }))
        .await;
    assert_eq!(
        foreign.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        "http://app.example.com"
    );
}
