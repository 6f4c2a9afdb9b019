//! Agent Views
//!
//! Figures shown on an agent's detail page: time spent on chunks, current
//! speed, device statistics and the tasks the agent can still be given.

use hashtopolis_console_core::{fetch_typed, EntityFetcher, ListQuery, Resource};
use serde::{Deserialize, Serialize};

use crate::models::{AgentStat, AgentStatType, Chunk, Task};
use crate::services::tasks::ChunkAggregator;
use crate::utils::error::AppResult;

/// Samples at or before this timestamp are ignored.
pub const STAT_TIME_CUTOFF: i64 = 10_000_000;

/// Total seconds the agent spent on the given chunks.
pub fn agent_time_spent(chunks: &[Chunk]) -> i64 {
    chunks
        .iter()
        .map(|c| c.last_activity() - c.dispatch_time)
        .sum()
}

/// Tasks that still have keyspace left or have not started.
pub fn assignable_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks.iter().filter(|t| t.is_assignable()).cloned().collect()
}

/// Unarchived tasks an agent can be assigned to.
pub async fn load_assignable_tasks(
    fetcher: &dyn EntityFetcher,
    max_results: u32,
) -> AppResult<Vec<Task>> {
    let query = ListQuery::new()
        .max_results(max_results)
        .filter_eq("isArchived", false);
    let page = fetch_typed::<Task>(fetcher, Resource::Tasks, &query).await?;
    Ok(assignable_tasks(&page.values))
}

/// Summary of one statistic type across all devices and samples.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatSummary {
    pub stat_type: AgentStatType,
    pub samples: usize,
    pub average: f64,
    pub max: i64,
    /// Time of the newest sample used.
    pub latest_time: i64,
}

impl AgentStatSummary {
    /// `None` when there are no usable samples of that type.
    pub fn from_stats(stats: &[AgentStat], stat_type: AgentStatType) -> Option<Self> {
        let used: Vec<&AgentStat> = stats
            .iter()
            .filter(|s| s.kind() == Some(stat_type) && s.time > STAT_TIME_CUTOFF)
            .collect();
        let values: Vec<i64> = used.iter().flat_map(|s| s.value.iter().copied()).collect();
        if values.is_empty() {
            return None;
        }
        Some(Self {
            stat_type,
            samples: values.len(),
            average: values.iter().sum::<i64>() as f64 / values.len() as f64,
            max: values.iter().copied().max().unwrap_or(0),
            latest_time: used.iter().map(|s| s.time).max().unwrap_or(0),
        })
    }
}

/// An agent's chunks with the derived totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentWorkload {
    pub agent_id: i64,
    pub chunks: Vec<Chunk>,
    pub time_spent_secs: i64,
    pub current_speed: i64,
}

impl AgentWorkload {
    /// Fetch the agent's chunks and the task list concurrently and attach
    /// each chunk's task when the backend did not embed it.
    pub async fn load(
        fetcher: &dyn EntityFetcher,
        aggregator: &ChunkAggregator,
        agent_id: i64,
    ) -> AppResult<Self> {
        let cap = aggregator.config().max_results_cap;
        let chunk_query = ListQuery::new()
            .max_results(cap)
            .filter_eq("agentId", agent_id);
        let task_query = ListQuery::new().max_results(cap);

        let (chunks, tasks) = tokio::try_join!(
            fetch_typed::<Chunk>(fetcher, Resource::Chunks, &chunk_query),
            fetch_typed::<Task>(fetcher, Resource::Tasks, &task_query),
        )?;

        let chunks: Vec<Chunk> = chunks
            .values
            .into_iter()
            .filter(|c| c.agent_id == Some(agent_id))
            .map(|mut chunk| {
                if chunk.task.is_none() {
                    chunk.task = tasks
                        .values
                        .iter()
                        .find(|t| t.chunk_task_id() == chunk.task_id)
                        .cloned();
                }
                chunk
            })
            .collect();

        tracing::debug!(
            "[AgentWorkload] Agent {} has {} chunks",
            agent_id,
            chunks.len()
        );

        Ok(Self {
            agent_id,
            time_spent_secs: agent_time_spent(&chunks),
            current_speed: aggregator.current_speed(&chunks),
            chunks,
        })
    }
}
