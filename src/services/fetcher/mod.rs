//! Entity Fetchers
//!
//! Implementations of the core `EntityFetcher` trait: the HTTP client used
//! against a live backend and an in-memory fetcher used for fixtures.

pub mod http;
pub mod memory;

pub use http::HttpEntityFetcher;
pub use memory::InMemoryFetcher;
