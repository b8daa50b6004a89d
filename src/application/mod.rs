//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::MappingRepository`]
//! trait and expose a small API to the HTTP handlers.
//!
//! - [`services::link_service::LinkService`] - Short code minting with bounded retries
//! - [`services::visit_count_service::VisitCountService`] - Batched visit counting

pub mod services;
