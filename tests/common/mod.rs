#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use std::sync::Arc;
use std::time::Duration;
use url_minter::api::handlers::health_handler;
use url_minter::api::middleware::cors::CorsPolicy;
use url_minter::api::routes::{shorten_routes, visit_routes};
use url_minter::application::services::{LinkService, VisitCountService, VisitCountSettings};
use url_minter::domain::entities::NewMapping;
use url_minter::domain::repositories::{InsertOutcome, MappingRepository, StoreError};
use url_minter::infrastructure::persistence::MemoryMappingRepository;
use url_minter::state::AppState;
use url_minter::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

pub const BASE_URL: &str = "https://s.test.com";
pub const STORE_TIMEOUT: Duration = Duration::from_millis(200);

/// Returns true if `code` has exactly `length` ASCII alphanumeric characters.
pub fn is_alphanumeric_code(code: &str, length: usize) -> bool {
    code.len() == length && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Always returns the same code.
pub struct FixedCodeGenerator(pub &'static str);

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

/// Store whose calls never complete.
pub struct StalledRepository;

#[async_trait]
impl MappingRepository for StalledRepository {
    async fn insert_if_absent(&self, _new_mapping: NewMapping) -> Result<InsertOutcome, StoreError> {
        std::future::pending().await
    }

    async fn increment_visit_count(&self, _code: &str) -> Result<i64, StoreError> {
        std::future::pending().await
    }

    async fn health_check(&self) -> bool {
        std::future::pending().await
    }
}

/// Store whose every call fails as if the backend were down.
pub struct UnavailableRepository;

#[async_trait]
impl MappingRepository for UnavailableRepository {
    async fn insert_if_absent(&self, _new_mapping: NewMapping) -> Result<InsertOutcome, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn increment_visit_count(&self, _code: &str) -> Result<i64, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

pub fn build_state(
    store: Arc<dyn MappingRepository>,
    generator: Arc<dyn CodeGenerator>,
    cors: CorsPolicy,
) -> AppState {
    let link_service = Arc::new(LinkService::new(
        store.clone(),
        generator,
        BASE_URL,
        STORE_TIMEOUT,
    ));
    let visit_service = Arc::new(VisitCountService::new(
        store.clone(),
        VisitCountSettings {
            store_timeout: STORE_TIMEOUT,
            concurrency: 4,
            max_receive_count: 5,
        },
    ));

    AppState::new(link_service, visit_service, store, STORE_TIMEOUT, cors)
}

/// State backed by a fresh in-memory store, with a handle to inspect it.
pub fn create_test_state() -> (AppState, Arc<MemoryMappingRepository>) {
    create_test_state_with_cors(CorsPolicy::permissive())
}

pub fn create_test_state_with_cors(cors: CorsPolicy) -> (AppState, Arc<MemoryMappingRepository>) {
    let repo = Arc::new(MemoryMappingRepository::new());
    let state = build_state(repo.clone(), Arc::new(RandomCodeGenerator::default()), cors);

    (state, repo)
}

pub async fn seed_mapping(repo: &MemoryMappingRepository, code: &str, url: &str) {
    let outcome = repo
        .insert_if_absent(NewMapping::new(code, url, 1_700_000_000))
        .await
        .unwrap();
    assert_eq!(outcome, InsertOutcome::Inserted);
}

pub fn shorten_app(state: AppState) -> Router {
    shorten_routes(state.clone()).with_state(state)
}

pub fn visits_app(state: AppState) -> Router {
    visit_routes().with_state(state)
}

pub fn health_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}
