//! Utilities
//!
//! Common utilities used throughout the application.

pub mod datetime;
pub mod error;
pub mod paths;

pub use error::*;
pub use paths::*;
