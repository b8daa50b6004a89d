//! Repository trait for the URL mapping store.

use std::time::Duration;

use crate::domain::entities::NewMapping;
use async_trait::async_trait;

/// Result of a conditional insert.
///
/// A taken code is an ordinary outcome, not an error: callers branch on it
/// and generate another candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

/// Failures talking to the mapping store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no mapping exists for short code '{code}'")]
    NotFound { code: String },

    #[error("store call timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    /// Whether retrying the same call can never succeed.
    ///
    /// Increments never create records, so a missing code stays missing.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Narrow contract over the durable key-value store.
///
/// Both operations must be linearizable per key. Code uniqueness and counter
/// correctness under concurrency rely on the store alone; implementations
/// never pre-read to check existence.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::RedisMappingRepository`] - Redis hashes + Lua
/// - [`crate::infrastructure::persistence::MemoryMappingRepository`] - in-process map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Writes the mapping only if no record with the same code exists.
    ///
    /// # Returns
    ///
    /// - `Ok(InsertOutcome::Inserted)` if the record was written
    /// - `Ok(InsertOutcome::AlreadyExists)` if the code is taken
    ///
    /// # Errors
    ///
    /// Any other store failure (network, permissions, throttling).
    async fn insert_if_absent(&self, new_mapping: NewMapping) -> Result<InsertOutcome, StoreError>;

    /// Atomically adds one to `visit_count` and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the code has no record. Missing
    /// records are never created here.
    async fn increment_visit_count(&self, code: &str) -> Result<i64, StoreError>;

    /// Checks if the store backend is reachable.
    async fn health_check(&self) -> bool;
}

/// Runs a store call with an upper bound on its duration.
///
/// # Errors
///
/// Returns [`StoreError::Timeout`] if `call` does not finish within `limit`,
/// otherwise whatever `call` returned.
pub async fn with_store_timeout<T, F>(limit: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout { elapsed: limit }),
    }
}
