//! DTOs for link shortening endpoint.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::application::services::ShortLink;

/// Request to shorten a single URL.
///
/// Built from the raw body rather than through `Json<T>` so that a missing or
/// non-string `url` is reported as a missing URL instead of a JSON error.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ShortenRequest {
    /// `None` when the field is absent, `null` or not a string.
    pub url: Option<String>,
}

impl ShortenRequest {
    /// Parses a request body.
    ///
    /// An empty (or whitespace-only) body is treated as `{}`.
    ///
    /// # Errors
    ///
    /// Returns the parser error when the body is not valid JSON or is valid
    /// JSON but not an object.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let object: Map<String, Value> = serde_json::from_slice(body)?;

        let url = match object.get("url") {
            Some(Value::String(url)) => Some(url.clone()),
            _ => None,
        };

        Ok(Self { url })
    }
}

/// Successful creation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
}

impl From<ShortLink> for ShortenResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            original_url: link.original_url,
            short_code: link.code,
            short_url: link.short_url,
        }
    }
}
