//! Tasks Data Source
//!
//! Feeds the task table: loads the joined rows, publishes them into a
//! `TableDataSource`, and computes per-row metrics lazily for whatever rows
//! the view asks about.
//!
//! Every load takes a generation number. A load that finishes after a newer
//! one has started is discarded, so a slow response can never overwrite the
//! rows of a later reload.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::future::join_all;
use hashtopolis_console_core::EntityFetcher;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::aggregator::ChunkAggregator;
use super::join::TaskJoinEngine;
use super::metrics::{assigned_agent_count, TaskRowMetrics, AGENTS_DEPS, CHUNK_DATA_DEPS};
use crate::models::{ChunkData, ConsoleConfig, TaskRow};
use crate::services::table::{
    LoadOutcome, MemoStats, Memoizer, PaginationMode, TableDataSource,
};

/// Fields searched by the table's filter box.
pub const TASK_FILTER_PROPS: &[&str] = &[
    "_id",
    "taskName",
    "taskWrapperName",
    "hashlist.name",
    "hashlist.0.name",
];

pub struct TasksDataSource {
    join: TaskJoinEngine,
    aggregator: ChunkAggregator,
    table: RwLock<TableDataSource<TaskRow>>,
    generation: AtomicU64,
    chunk_memo: Memoizer<ChunkData>,
    agents_memo: Memoizer<Option<usize>>,
}

impl TasksDataSource {
    pub fn new(fetcher: Arc<dyn EntityFetcher>, config: &ConsoleConfig) -> Self {
        let aggregator = ChunkAggregator::new(fetcher.clone(), config.aggregator_config());
        Self::with_aggregator(fetcher, aggregator, config)
    }

    /// Use a preconfigured aggregator (for example one with a fixed clock).
    pub fn with_aggregator(
        fetcher: Arc<dyn EntityFetcher>,
        aggregator: ChunkAggregator,
        config: &ConsoleConfig,
    ) -> Self {
        let mut table = TableDataSource::new(PaginationMode::Client);
        table.set_filter_props(TASK_FILTER_PROPS);
        Self {
            join: TaskJoinEngine::new(fetcher, config.list_max_results),
            aggregator,
            table: RwLock::new(table),
            generation: AtomicU64::new(0),
            chunk_memo: Memoizer::new("chunk_data", CHUNK_DATA_DEPS, config.row_cache_capacity),
            agents_memo: Memoizer::new("agents", AGENTS_DEPS, config.row_cache_capacity),
        }
    }

    pub fn aggregator(&self) -> &ChunkAggregator {
        &self.aggregator
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn table(&self) -> RwLockReadGuard<'_, TableDataSource<TaskRow>> {
        self.table.read().await
    }

    pub async fn table_mut(&self) -> RwLockWriteGuard<'_, TableDataSource<TaskRow>> {
        self.table.write().await
    }

    /// Load and publish the task rows for the archived or active view.
    pub async fn load_all(&self, is_archived: bool) -> LoadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.table.write().await.set_loading(true);

        let result = self.join.try_load_all(is_archived).await;

        let mut table = self.table.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(
                "[TasksDataSource] Discarding load {} (current {})",
                generation,
                self.generation.load(Ordering::SeqCst)
            );
            return LoadOutcome::Superseded;
        }
        table.set_loading(false);

        match result {
            Ok(load) => {
                let count = load.rows.len();
                let (size, index) = (table.page_size(), table.page_index());
                table.set_pagination_config(size, index, load.total as usize);
                table.set_data(load.rows);
                tracing::info!(
                    "[TasksDataSource] Loaded {} rows (archived={})",
                    count,
                    is_archived
                );
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                tracing::warn!("[TasksDataSource] Load failed, showing no tasks: {}", e);
                table.set_data(Vec::new());
                LoadOutcome::Failed
            }
        }
    }

    /// Clear the table, then load again.
    pub async fn reload(&self, is_archived: bool) -> LoadOutcome {
        self.table.write().await.reset();
        self.load_all(is_archived).await
    }

    /// Metrics for one row, reusing cached results while the row's
    /// dependency fields are unchanged. A failed chunk fetch shows zeros and
    /// is retried on the next call.
    pub async fn row_metrics(&self, row: &TaskRow) -> TaskRowMetrics {
        let Some(task) = row.as_task() else {
            return TaskRowMetrics::default();
        };

        let agents = self
            .agents_memo
            .get_or_compute(row, |_| assigned_agent_count(task));

        let data = self
            .chunk_memo
            .get_or_try_compute_async(row, || {
                self.aggregator
                    .try_get_chunk_data(task.chunk_task_id(), task.keyspace)
            })
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(
                    "[TasksDataSource] Metrics for {} unavailable: {}",
                    row.row_key(),
                    e
                );
                ChunkData::default()
            });

        TaskRowMetrics::from_parts(task, agents, data)
    }

    /// Metrics for the rows on the current page, computed concurrently.
    pub async fn visible_metrics(&self) -> Vec<(TaskRow, TaskRowMetrics)> {
        let rows: Vec<TaskRow> = self.table.read().await.visible_rows().to_vec();
        let metrics = join_all(rows.iter().map(|row| self.row_metrics(row))).await;
        rows.into_iter().zip(metrics).collect()
    }

    pub fn cache_stats(&self) -> MemoStats {
        self.chunk_memo.stats()
    }

    /// Forget every cached metric.
    pub fn clear_cache(&self) {
        self.chunk_memo.clear();
        self.agents_memo.clear();
    }
}
