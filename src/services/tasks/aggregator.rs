//! Chunk Aggregator
//!
//! Derives per-task progress figures from the task's chunks:
//!
//! - `dispatched`: keyspace share of chunks at 100% progress
//! - `searched`: keyspace share actually walked (checkpoint - skip)
//! - `cracked`: hashes cracked across all chunks
//! - `speed`: combined speed of chunks still being worked on, i.e. touched
//!   within the activity window and not yet complete
//!
//! A task with no keyspace reports 0.0 for both fractions.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use hashtopolis_console_core::{fetch_typed, EntityFetcher, ListQuery, Resource};
use serde::{Deserialize, Serialize};

use crate::models::{AggregatorConfig, Chunk, ChunkData};
use crate::utils::error::AppResult;

/// Source of the current Unix time in seconds.
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Manually driven clock.
#[derive(Debug, Default)]
pub struct FixedClock {
    now: AtomicI64,
}

impl FixedClock {
    pub fn new(now_secs: i64) -> Self {
        Self {
            now: AtomicI64::new(now_secs),
        }
    }

    pub fn set(&self, now_secs: i64) {
        self.now.store(now_secs, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_secs(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Which chunk field a speed lookup filters on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpeedScope {
    Task,
    Agent,
}

impl SpeedScope {
    pub fn filter_field(&self) -> &'static str {
        match self {
            Self::Task => "taskId",
            Self::Agent => "agentId",
        }
    }

    fn matches(&self, chunk: &Chunk, id: i64) -> bool {
        match self {
            Self::Task => chunk.task_id == id,
            Self::Agent => chunk.agent_id == Some(id),
        }
    }
}

/// Combined speed of the chunks active at `now_secs`. Never negative.
pub fn active_speed(chunks: &[Chunk], window_secs: i64, now_secs: i64) -> i64 {
    chunks
        .iter()
        .filter(|c| c.is_active(window_secs, now_secs))
        .map(|c| c.speed)
        .sum::<i64>()
        .max(0)
}

/// Aggregate a task's chunks in a single pass.
pub fn summarize_chunks(
    chunks: &[Chunk],
    keyspace: i64,
    window_secs: i64,
    now_secs: i64,
) -> ChunkData {
    let mut dispatched = 0i64;
    let mut searched = 0i64;
    let mut cracked = 0i64;
    let mut speed = 0i64;

    for chunk in chunks {
        if chunk.is_complete() {
            dispatched += chunk.length;
        }
        searched += chunk.searched();
        cracked += chunk.cracked;
        if chunk.is_active(window_secs, now_secs) {
            speed += chunk.speed;
        }
    }

    let fraction = |part: i64| {
        if keyspace > 0 {
            part as f64 / keyspace as f64
        } else {
            0.0
        }
    };

    ChunkData {
        dispatched: fraction(dispatched),
        searched: fraction(searched),
        cracked,
        speed: speed.max(0),
    }
}

/// Fetches chunks and aggregates them.
pub struct ChunkAggregator {
    fetcher: Arc<dyn EntityFetcher>,
    config: AggregatorConfig,
    clock: Arc<dyn Clock>,
}

impl ChunkAggregator {
    pub fn new(fetcher: Arc<dyn EntityFetcher>, config: AggregatorConfig) -> Self {
        Self::with_clock(fetcher, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        fetcher: Arc<dyn EntityFetcher>,
        config: AggregatorConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fetcher,
            config,
            clock,
        }
    }

    pub fn config(&self) -> AggregatorConfig {
        self.config
    }

    pub fn now_secs(&self) -> i64 {
        self.clock.now_secs()
    }

    /// All chunks of one task or one agent, in a single request capped at
    /// `max_results_cap`. Records not matching the id are dropped.
    pub async fn fetch_chunks(&self, id: i64, scope: SpeedScope) -> AppResult<Vec<Chunk>> {
        let query = ListQuery::new()
            .max_results(self.config.max_results_cap)
            .filter_eq(scope.filter_field(), id);
        let page = fetch_typed::<Chunk>(self.fetcher.as_ref(), Resource::Chunks, &query).await?;
        if !page.is_last {
            tracing::warn!(
                "[ChunkAggregator] {} chunks for {}={}, only {} fetched",
                page.total,
                scope.filter_field(),
                id,
                page.values.len()
            );
        }
        Ok(page
            .values
            .into_iter()
            .filter(|c| scope.matches(c, id))
            .collect())
    }

    pub async fn try_get_chunk_data(&self, task_id: i64, keyspace: i64) -> AppResult<ChunkData> {
        let chunks = self.fetch_chunks(task_id, SpeedScope::Task).await?;
        Ok(summarize_chunks(
            &chunks,
            keyspace,
            self.config.chunk_time_window_secs,
            self.now_secs(),
        ))
    }

    /// Chunk data for a task; all zeros when the chunks cannot be fetched.
    pub async fn get_chunk_data(&self, task_id: i64, keyspace: i64) -> ChunkData {
        self.try_get_chunk_data(task_id, keyspace)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(
                    "[ChunkAggregator] Chunk data for task {} unavailable: {}",
                    task_id,
                    e
                );
                ChunkData::default()
            })
    }

    pub async fn try_get_speed(
        &self,
        id: i64,
        chunk_time_secs: i64,
        scope: SpeedScope,
    ) -> AppResult<i64> {
        let chunks = self.fetch_chunks(id, scope).await?;
        Ok(active_speed(&chunks, chunk_time_secs, self.now_secs()))
    }

    /// Current speed of a task or an agent over the given activity window;
    /// zero when the chunks cannot be fetched.
    pub async fn get_speed(&self, id: i64, chunk_time_secs: i64, scope: SpeedScope) -> i64 {
        self.try_get_speed(id, chunk_time_secs, scope)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(
                    "[ChunkAggregator] Speed for {:?} {} unavailable: {}",
                    scope,
                    id,
                    e
                );
                0
            })
    }

    /// Speed of already fetched chunks with the configured window.
    pub fn current_speed(&self, chunks: &[Chunk]) -> i64 {
        active_speed(chunks, self.config.chunk_time_window_secs, self.now_secs())
    }
}
