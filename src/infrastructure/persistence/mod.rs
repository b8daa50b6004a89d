//! Mapping store implementations.
//!
//! # Repositories
//!
//! - [`PgMappingRepository`] - PostgreSQL via SQLx
//! - [`RedisMappingRepository`] - Redis hashes updated by Lua scripts
//! - [`MemoryMappingRepository`] - In-process map for tests and local runs

pub mod memory_mapping_repository;
pub mod pg_mapping_repository;
pub mod redis_mapping_repository;

pub use memory_mapping_repository::MemoryMappingRepository;
pub use pg_mapping_repository::{MappingSummary, PgMappingRepository, is_valid_table_name};
pub use redis_mapping_repository::RedisMappingRepository;
