//! Task Services
//!
//! Join engine, chunk aggregator, row metrics and the data source behind the
//! task table.

pub mod aggregator;
pub mod datasource;
pub mod join;
pub mod metrics;

pub use aggregator::{
    active_speed, summarize_chunks, ChunkAggregator, Clock, FixedClock, SpeedScope, SystemClock,
};
pub use datasource::{TasksDataSource, TASK_FILTER_PROPS};
pub use join::{merge_task_rows, TaskJoinEngine, TaskLoad, TASK_EXPANSIONS};
pub use metrics::{TaskRowMetrics, TaskStatus, AGENTS_DEPS, CHUNK_DATA_DEPS};
