//! Business logic services for the application layer.

pub mod link_service;
pub mod visit_count_service;

pub use link_service::{LinkService, MAX_CREATE_ATTEMPTS, ShortLink};
pub use visit_count_service::{BatchReport, EventOutcome, VisitCountService, VisitCountSettings};
