//! Short link creation service.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tracing::{info, warn};

use crate::domain::entities::NewMapping;
use crate::domain::repositories::{InsertOutcome, MappingRepository, with_store_timeout};
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::time::epoch_seconds;

/// Upper bound on candidate codes tried for one request.
pub const MAX_CREATE_ATTEMPTS: usize = 3;

/// A freshly minted short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub code: String,
    pub original_url: String,
    pub short_url: String,
}

/// Service for minting short codes and persisting their mappings.
///
/// Collisions are detected by the store's conditional write, never by a
/// pre-read, so concurrent instances can't both claim the same code.
pub struct LinkService<M: MappingRepository + ?Sized> {
    repository: Arc<M>,
    generator: Arc<dyn CodeGenerator>,
    base_url: String,
    store_timeout: Duration,
}

impl<M: MappingRepository + ?Sized> LinkService<M> {
    /// Creates a new link service.
    ///
    /// A trailing `/` on `base_url` is dropped so that short URLs are always
    /// `{base_url}/{code}`.
    pub fn new(
        repository: Arc<M>,
        generator: Arc<dyn CodeGenerator>,
        base_url: impl Into<String>,
        store_timeout: Duration,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            repository,
            generator,
            base_url,
            store_timeout,
        }
    }

    /// Mints a short code for `original_url` and stores the mapping.
    ///
    /// # Retry policy
    ///
    /// Tries at most [`MAX_CREATE_ATTEMPTS`] candidate codes. Only a taken
    /// code triggers another attempt; any store failure ends the request.
    ///
    /// # Errors
    ///
    /// - [`AppError::MissingUrl`] if the URL is absent or empty
    /// - [`AppError::CodeSpaceExhausted`] if every attempt collided
    /// - [`AppError::Store`] on any other store failure, including timeouts
    pub async fn create_short_link(&self, original_url: Option<&str>) -> Result<ShortLink, AppError> {
        let original_url = match original_url {
            Some(url) if !url.is_empty() => url,
            _ => return Err(AppError::MissingUrl),
        };

        let created_at = epoch_seconds();

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let code = self.generator.generate();
            let new_mapping = NewMapping::new(code.as_str(), original_url, created_at);

            let outcome = with_store_timeout(
                self.store_timeout,
                self.repository.insert_if_absent(new_mapping),
            )
            .await?;

            match outcome {
                InsertOutcome::Inserted => {
                    counter!("short_links_created_total").increment(1);
                    info!(%code, attempt, "Short link created");

                    return Ok(ShortLink {
                        short_url: self.short_url(&code),
                        code,
                        original_url: original_url.to_string(),
                    });
                }
                InsertOutcome::AlreadyExists => {
                    counter!("short_code_collisions_total").increment(1);
                    warn!(%code, attempt, "Short code collision, retrying");
                }
            }
        }

        counter!("short_code_exhaustion_total").increment(1);

        Err(AppError::CodeSpaceExhausted {
            attempts: MAX_CREATE_ATTEMPTS,
        })
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
