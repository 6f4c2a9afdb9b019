//! Task Row Metrics
//!
//! Derived per-row figures shown in the task table, and the field lists each
//! derivation depends on. Field names are the serialized row names.

use serde::{Deserialize, Serialize};

use crate::models::{ChunkData, Task, TaskRow};
use crate::services::table::RowIdentity;

/// Fields the assigned-agent count reads.
pub const AGENTS_DEPS: &[&str] = &["kind", "_id", "assignedAgents"];

/// Fields that trigger a new chunk fetch when changed.
pub const CHUNK_DATA_DEPS: &[&str] = &[
    "kind",
    "_id",
    "taskId",
    "keyspace",
    "keyspaceProgress",
    "assignedAgents",
];

impl RowIdentity for TaskRow {
    fn row_key(&self) -> String {
        TaskRow::row_key(self)
    }
}

/// Coarse state shown in the status column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    InProgress,
    Completed,
    Idle,
}

impl TaskStatus {
    pub fn derive(task: &Task, speed: i64) -> Self {
        if speed > 0 {
            Self::InProgress
        } else if task.is_completed() {
            Self::Completed
        } else {
            Self::Idle
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Idle => "Idle",
        }
    }
}

/// Everything the task table derives for one row. Super-task rows carry no
/// metrics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRowMetrics {
    pub agents: Option<usize>,
    pub speed: Option<i64>,
    pub dispatched: Option<f64>,
    pub searched: Option<f64>,
    pub cracked: Option<i64>,
    pub status: Option<TaskStatus>,
}

impl TaskRowMetrics {
    pub fn from_parts(task: &Task, agents: Option<usize>, data: ChunkData) -> Self {
        Self {
            agents,
            speed: Some(data.speed),
            dispatched: Some(data.dispatched),
            searched: Some(data.searched),
            cracked: Some(data.cracked),
            status: Some(TaskStatus::derive(task, data.speed)),
        }
    }
}

/// Number of agents assigned to the task, when the backend expanded them.
pub fn assigned_agent_count(task: &Task) -> Option<usize> {
    task.assigned_agents.as_ref().map(Vec::len)
}
