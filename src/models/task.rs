//! Task Models
//!
//! Tasks, task wrappers (super-tasks) and the merged row shown in the task
//! table. A row is either a standalone task or a super-task; the variant is
//! resolved once at join time.

use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::hashlist::Hashlist;
use super::serde_helpers::{lenient_i64, one_or_many};

/// Wrapper discriminant as stored by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Standalone task, wrapped by a single-task wrapper.
    Normal,
    /// Wrapper grouping several sub-tasks.
    Super,
}

impl TaskType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Normal),
            1 => Some(Self::Super),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::Normal => 0,
            Self::Super => 1,
        }
    }
}

/// A unit of cracking work over a keyspace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id", default)]
    pub id: i64,
    #[serde(default)]
    pub task_id: i64,
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub attack_cmd: String,
    #[serde(default)]
    pub chunk_size: i64,
    #[serde(default)]
    pub chunk_time: i64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_cpu_task: bool,
    #[serde(default)]
    pub is_small: bool,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub keyspace: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub keyspace_progress: i64,
    #[serde(default)]
    pub max_agents: i64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub preprocessor_id: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub priority: i64,
    #[serde(default)]
    pub task_wrapper_id: i64,
    #[serde(default, deserialize_with = "one_or_many")]
    pub hashlist: Vec<Hashlist>,
    /// Present only when the backend expanded `assignedAgents`.
    #[serde(default)]
    pub assigned_agents: Option<Vec<Agent>>,
}

impl Task {
    /// Identifier used for chunk lookups (`taskId`), falling back to `_id`.
    pub fn chunk_task_id(&self) -> i64 {
        if self.task_id != 0 {
            self.task_id
        } else {
            self.id
        }
    }

    /// Keyspace fully walked.
    pub fn is_completed(&self) -> bool {
        self.keyspace_progress >= self.keyspace && self.keyspace_progress > 0
    }

    /// Still has keyspace left, or has not started.
    pub fn is_assignable(&self) -> bool {
        self.keyspace_progress < self.keyspace || self.keyspace_progress == 0
    }
}

/// A named grouping of tasks (a super-task when `task_type == 1`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskWrapper {
    #[serde(rename = "_id", default)]
    pub id: i64,
    pub task_wrapper_id: i64,
    #[serde(default)]
    pub task_wrapper_name: String,
    #[serde(default)]
    pub task_type: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub priority: i64,
    #[serde(default)]
    pub hashlist_id: i64,
    #[serde(default)]
    pub access_group_id: i64,
    #[serde(default)]
    pub cracked: i64,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub max_agents: i64,
}

impl TaskWrapper {
    pub fn kind(&self) -> Option<TaskType> {
        TaskType::from_code(self.task_type)
    }
}

/// A super-task row with its hashlist resolved.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuperTaskRow {
    #[serde(flatten)]
    pub wrapper: TaskWrapper,
    /// `None` when the referenced hashlist was not in the fetched page.
    pub hashlist: Option<Hashlist>,
}

/// One row of the merged task view.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskRow {
    Normal(Task),
    Super(SuperTaskRow),
}

impl TaskRow {
    /// Identity key, unique across both variants.
    pub fn row_key(&self) -> String {
        match self {
            Self::Normal(task) => format!("task-{}", task.id),
            Self::Super(row) => format!("wrapper-{}", row.wrapper.task_wrapper_id),
        }
    }

    pub fn task_type(&self) -> TaskType {
        match self {
            Self::Normal(_) => TaskType::Normal,
            Self::Super(_) => TaskType::Super,
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Self::Normal(_))
    }

    pub fn priority(&self) -> i64 {
        match self {
            Self::Normal(task) => task.priority,
            Self::Super(row) => row.wrapper.priority,
        }
    }

    /// Id shown in the table: the task id, or the wrapper id for super-tasks.
    pub fn display_id(&self) -> i64 {
        match self {
            Self::Normal(task) => task.id,
            Self::Super(row) => row.wrapper.task_wrapper_id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Normal(task) => &task.task_name,
            Self::Super(row) => &row.wrapper.task_wrapper_name,
        }
    }

    pub fn task_wrapper_id(&self) -> i64 {
        match self {
            Self::Normal(task) => task.task_wrapper_id,
            Self::Super(row) => row.wrapper.task_wrapper_id,
        }
    }

    /// First hashlist attached to the row, if any.
    pub fn hashlist(&self) -> Option<&Hashlist> {
        match self {
            Self::Normal(task) => task.hashlist.first(),
            Self::Super(row) => row.hashlist.as_ref(),
        }
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            Self::Normal(task) => Some(task),
            Self::Super(_) => None,
        }
    }
}
