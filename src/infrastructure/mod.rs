//! Infrastructure layer for external integrations.
//!
//! Implements the store contract defined by the domain layer.
//!
//! - [`persistence`] - PostgreSQL, Redis and in-memory mapping stores

pub mod persistence;
