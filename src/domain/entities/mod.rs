//! Core domain entities.
//!
//! - [`UrlMapping`] - A persisted short code to URL mapping
//! - [`NewMapping`] - Insert payload for a mapping that does not exist yet

pub mod mapping;

pub use mapping::{NewMapping, UrlMapping};
