//! Domain layer containing business entities and store contracts.
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Store trait definitions
//! - [`visit_event`] - Counting messages delivered by the transport
//!
//! The domain layer has no dependencies on the HTTP layer. Business logic is
//! encapsulated in services (see [`crate::application::services`]).

pub mod entities;
pub mod repositories;
pub mod visit_event;
