//! Chunks Data Source
//!
//! Loads chunks together with the agent list and attaches the assigned agent
//! to each chunk. A missing agent leaves the reference empty; the table then
//! falls back to the raw agent id.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hashtopolis_console_core::{fetch_typed, EntityFetcher, ListQuery, Resource};
use serde::Serialize;
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::models::{Agent, Chunk, ChunkState, ConsoleConfig};
use crate::services::table::{LoadOutcome, PaginationMode, RowIdentity, TableDataSource};
use crate::utils::datetime::{format_seconds, format_timestamp};
use crate::utils::error::AppResult;

pub const CHUNK_FILTER_PROPS: &[&str] = &["_id", "taskId", "task.taskName", "agent.agentName"];

/// A chunk with its agent resolved.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRow {
    #[serde(flatten)]
    pub chunk: Chunk,
    pub agent: Option<Agent>,
}

impl RowIdentity for ChunkRow {
    fn row_key(&self) -> String {
        format!("chunk-{}", self.chunk.id)
    }
}

impl ChunkRow {
    /// Seconds between dispatch and the last report; 0 until solved.
    pub fn time_spent_secs(&self) -> i64 {
        (self.chunk.solve_time - self.chunk.dispatch_time).max(0)
    }

    pub fn time_spent_display(&self) -> String {
        format_seconds(self.time_spent_secs())
    }

    /// Share of the chunk walked so far, in percent.
    pub fn checkpoint_percent(&self) -> f64 {
        if self.chunk.progress == 0 || self.chunk.length == 0 {
            return 0.0;
        }
        self.chunk.searched() as f64 / self.chunk.length as f64 * 100.0
    }

    /// Reported progress in percent.
    pub fn progress_percent(&self) -> f64 {
        self.chunk.progress as f64 / 100.0
    }

    pub fn state(&self) -> Option<ChunkState> {
        self.chunk.state()
    }

    pub fn last_activity(&self) -> i64 {
        self.chunk.last_activity()
    }

    pub fn last_activity_display(&self, time_format: &str) -> String {
        format_timestamp(self.last_activity(), time_format)
    }

    /// Agent name, or the raw id when the agent is unknown.
    pub fn agent_label(&self) -> String {
        match (&self.agent, self.chunk.agent_id) {
            (Some(agent), _) => agent.agent_name.clone(),
            (None, Some(id)) => id.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Attach each chunk's agent, optionally keeping only one agent's chunks.
pub fn attach_agents(
    chunks: Vec<Chunk>,
    agents: &[Agent],
    agent_id: Option<i64>,
) -> Vec<ChunkRow> {
    chunks
        .into_iter()
        .filter(|c| agent_id.is_none() || c.agent_id == agent_id)
        .map(|chunk| {
            let agent = chunk
                .agent_id
                .and_then(|id| agents.iter().find(|a| a.key() == id))
                .cloned();
            ChunkRow { chunk, agent }
        })
        .collect()
}

pub struct ChunksDataSource {
    fetcher: Arc<dyn EntityFetcher>,
    chunk_max_results: u32,
    agent_max_results: u32,
    table: RwLock<TableDataSource<ChunkRow>>,
    generation: AtomicU64,
}

impl ChunksDataSource {
    pub fn new(fetcher: Arc<dyn EntityFetcher>, config: &ConsoleConfig) -> Self {
        let mut table = TableDataSource::new(PaginationMode::Client);
        table.set_filter_props(CHUNK_FILTER_PROPS);
        Self {
            fetcher,
            chunk_max_results: config.list_max_results,
            agent_max_results: config.max_results_cap,
            table: RwLock::new(table),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn table(&self) -> RwLockReadGuard<'_, TableDataSource<ChunkRow>> {
        self.table.read().await
    }

    /// Fetch chunks (with their task) and agents concurrently.
    pub async fn try_load(&self, agent_id: Option<i64>) -> AppResult<Vec<ChunkRow>> {
        let mut chunk_query = ListQuery::new()
            .max_results(self.chunk_max_results)
            .expand("task");
        if let Some(id) = agent_id {
            chunk_query = chunk_query.filter_eq("agentId", id);
        }
        let agent_query = ListQuery::new().max_results(self.agent_max_results);

        let fetcher = self.fetcher.as_ref();
        let (chunks, agents) = tokio::try_join!(
            fetch_typed::<Chunk>(fetcher, Resource::Chunks, &chunk_query),
            fetch_typed::<Agent>(fetcher, Resource::Agents, &agent_query),
        )?;

        Ok(attach_agents(chunks.values, &agents.values, agent_id))
    }

    pub async fn load_all(&self, agent_id: Option<i64>) -> LoadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.table.write().await.set_loading(true);

        let result = self.try_load(agent_id).await;

        let mut table = self.table.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            return LoadOutcome::Superseded;
        }
        table.set_loading(false);

        match result {
            Ok(rows) => {
                let count = rows.len();
                table.set_data(rows);
                tracing::info!("[ChunksDataSource] Loaded {} chunks", count);
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                tracing::warn!("[ChunksDataSource] Load failed, showing no chunks: {}", e);
                table.set_data(Vec::new());
                LoadOutcome::Failed
            }
        }
    }

    pub async fn reload(&self, agent_id: Option<i64>) -> LoadOutcome {
        self.table.write().await.reset();
        self.load_all(agent_id).await
    }
}
