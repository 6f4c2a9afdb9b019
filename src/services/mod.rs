//! Services
//!
//! The console's data layer: fetchers for the backend list API, the task and
//! chunk data sources behind the tables, and agent detail views.

pub mod agents;
pub mod chunks;
pub mod fetcher;
pub mod table;
pub mod tasks;

pub use agents::{AgentStatSummary, AgentWorkload};
pub use chunks::{ChunkRow, ChunksDataSource};
pub use fetcher::{HttpEntityFetcher, InMemoryFetcher};
pub use table::{LoadOutcome, Memoizer, TableDataSource};
pub use tasks::{
    ChunkAggregator, SpeedScope, TaskJoinEngine, TaskRowMetrics, TaskStatus, TasksDataSource,
};
