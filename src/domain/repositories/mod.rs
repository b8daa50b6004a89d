//! Repository trait definitions for the domain layer.
//!
//! The mapping store is the only external collaborator with state. Its
//! contract lives here; implementations live in
//! `crate::infrastructure::persistence`.
//!
//! Mock implementations are auto-generated via `mockall` for testing.

pub mod mapping_repository;

pub use mapping_repository::{InsertOutcome, MappingRepository, StoreError, with_store_timeout};

#[cfg(test)]
pub use mapping_repository::MockMappingRepository;
