//! Storage Layer
//!
//! Local persistence for console settings.

pub mod config;

pub use config::{ConfigService, API_TOKEN_ENV};
