//! CORS headers for the browser-facing creation endpoint.
//!
//! Every response passing through [`layer`] (success, error or preflight)
//! carries the same header set. The allowed origin depends on
//! `FRONTEND_DOMAIN`:
//!
//! - unset: `*`
//! - set, and the request `Origin` host equals it: the request origin is echoed
//! - set, any other origin: `http://{FRONTEND_DOMAIN}`

use axum::{
    extract::{Request, State},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, ORIGIN,
        },
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::state::AppState;

const ALLOW_METHODS: &str = "POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";

/// Origin policy derived from the configured frontend domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsPolicy {
    frontend_domain: Option<String>,
}

impl CorsPolicy {
    pub fn new(frontend_domain: Option<String>) -> Self {
        Self {
            frontend_domain: frontend_domain.filter(|d| !d.is_empty()),
        }
    }

    /// Any origin is allowed.
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Resolves the `Access-Control-Allow-Origin` value for a request origin.
    pub fn allow_origin(&self, request_origin: Option<&str>) -> String {
        let Some(domain) = self.frontend_domain.as_deref() else {
            return "*".to_string();
        };

        match request_origin {
            Some(origin) if origin_host(origin).eq_ignore_ascii_case(domain) => origin.to_string(),
            _ => format!("http://{}", domain),
        }
    }

    /// Writes the full CORS header set into `headers`.
    pub fn apply(&self, request_origin: Option<&str>, headers: &mut HeaderMap) {
        let origin = self.allow_origin(request_origin);
        let origin = HeaderValue::from_str(&origin).unwrap_or_else(|_| HeaderValue::from_static("*"));

        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
}

/// Host part of an origin: scheme, port and path are ignored.
fn origin_host(origin: &str) -> &str {
    let without_scheme = origin
        .split_once("://")
        .map_or(origin, |(_, rest)| rest);
    let authority = without_scheme.split('/').next().unwrap_or(without_scheme);

    authority.split(':').next().unwrap_or(authority)
}

/// Middleware adding CORS headers to every response.
///
/// # Integration
///
/// ```rust,ignore
/// Router::new()
///     .route("/shorten", post(shorten_handler).options(preflight_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), cors::layer))
/// ```
pub async fn layer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut response = next.run(request).await;
    state.cors.apply(origin.as_deref(), response.headers_mut());

    response
}

/// Answers a CORS preflight with 204. Headers are added by [`layer`].
pub async fn preflight_handler() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
