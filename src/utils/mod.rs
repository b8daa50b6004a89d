//! Utility functions shared across the application.
//!
//! - [`code_generator`] - Short code generation
//! - [`time`] - Epoch timestamps

pub mod code_generator;
pub mod time;
