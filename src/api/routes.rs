//! API route configuration.

use crate::api::handlers::{shorten_handler, visit_batch_handler};
use crate::api::middleware::cors::{self, preflight_handler};
use crate::state::AppState;
use axum::{Router, middleware, routing::post};

/// Browser-facing creation route, wrapped in the CORS layer.
///
/// # Endpoints
///
/// - `POST    /shorten` - Create a short link
/// - `OPTIONS /shorten` - CORS preflight
pub fn shorten_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler).options(preflight_handler))
        .route_layer(middleware::from_fn_with_state(state, cors::layer))
}

/// Transport-facing counting route.
///
/// # Endpoints
///
/// - `POST /visits/batch` - Apply a batch of visit events
pub fn visit_routes() -> Router<AppState> {
    Router::new().route("/visits/batch", post(visit_batch_handler))
}
