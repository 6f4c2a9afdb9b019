//! Hashtopolis Console - Task and Chunk Aggregation
//!
//! The data layer of the cluster administration console:
//! - Joining tasks, super-tasks and hashlists into table rows
//! - Aggregating chunk progress, cracked counts and live speed per task
//! - Memoizing per-row metrics across render cycles
//! - Sorting, filtering, paging and selecting table rows
//! - Console configuration and the HTTP client for the backend list API

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use hashtopolis_console_core::{
    fetch_typed, CoreError, CoreResult, EntityFetcher, FilterClause, ListQuery, ListResponse,
    Resource,
};
pub use models::{AggregatorConfig, Chunk, ChunkData, ConsoleConfig, Task, TaskRow, TaskWrapper};
pub use storage::ConfigService;
pub use utils::error::{AppError, AppResult};
