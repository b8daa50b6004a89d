//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod shorten;
pub mod visits;

pub use health::health_handler;
pub use shorten::shorten_handler;
pub use visits::visit_batch_handler;
