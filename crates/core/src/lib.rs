//! Hashtopolis Console Core
//!
//! Foundational traits, error types, and list-query primitives for the console
//! workspace. This crate has zero dependencies on application-level code
//! (HTTP clients, runtimes, caches, etc.).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `resource` - Backend collection catalogue (`Resource`)
//! - `query` - List query and filter-expression builder (`ListQuery`, `FilterClause`)
//! - `response` - List response envelope (`ListResponse`)
//! - `fetcher` - The backend collaborator trait (`EntityFetcher`)

pub mod error;
pub mod fetcher;
pub mod query;
pub mod resource;
pub mod response;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Backend Collaborator ───────────────────────────────────────────────
pub use fetcher::{fetch_typed, EntityFetcher};
pub use query::{FilterClause, ListQuery};
pub use resource::Resource;
pub use response::ListResponse;
