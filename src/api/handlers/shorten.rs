//! Handler for link shortening endpoint.

use axum::{Json, body::Bytes, extract::State};

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "originalUrl": "https://example.com/some/long/path",
///   "shortCode": "aB3xY9",
///   "shortUrl": "https://s.example.com/aB3xY9"
/// }
/// ```
///
/// # Errors
///
/// - 400 `URL is required` when `url` is missing, null, not a string or empty
/// - 400 `Invalid JSON in request body` when the body does not parse as an object
/// - 500 `Unable to generate unique short code` after exhausting attempts
/// - 500 `Internal server error` on store failures
pub async fn shorten_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ShortenResponse>, AppError> {
    let request = ShortenRequest::from_body(&body).map_err(AppError::InvalidJson)?;

    let link = state
        .link_service
        .create_short_link(request.url.as_deref())
        .await?;

    Ok(Json(link.into()))
}
