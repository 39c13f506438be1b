//! Enterprise Lookup Core Library
//!
//! Client-side core for a consumer enterprise-lookup service: faceted
//! search compilation with tier-gated pagination, a checkout state machine
//! for membership purchases, and the daily export quota gate.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
