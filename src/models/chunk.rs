//! Chunk Models
//!
//! A chunk is a contiguous slice of one task's keyspace handed to a single
//! agent. `ChunkData` is the per-task aggregate derived from a chunk set.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::serde_helpers::{lenient_i64, optional_one};
use super::task::Task;

/// Fixed-point progress value meaning 100.00%.
pub const PROGRESS_COMPLETE: i64 = 10_000;

/// Chunk lifecycle state reported by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ChunkState {
    New,
    Init,
    Running,
    Paused,
    Exhausted,
    Cracked,
    Aborted,
    Quit,
    Bypass,
    Trimmed,
    Aborting,
}

impl ChunkState {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::New),
            1 => Some(Self::Init),
            2 => Some(Self::Running),
            3 => Some(Self::Paused),
            4 => Some(Self::Exhausted),
            5 => Some(Self::Cracked),
            6 => Some(Self::Aborted),
            7 => Some(Self::Quit),
            8 => Some(Self::Bypass),
            9 => Some(Self::Trimmed),
            10 => Some(Self::Aborting),
            _ => None,
        }
    }

    /// Label shown in the chunk table.
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Init => "Init",
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::Exhausted => "Exhausted",
            Self::Cracked => "Cracked",
            Self::Aborted => "Aborted",
            Self::Quit => "Quit",
            Self::Bypass => "Bypass",
            Self::Trimmed => "Trimmed",
            Self::Aborting => "Aborting...",
        }
    }
}

impl fmt::Display for ChunkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One keyspace slice assigned to an agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    #[serde(rename = "_id", default)]
    pub id: i64,
    #[serde(default)]
    pub chunk_id: i64,
    pub task_id: i64,
    #[serde(default)]
    pub agent_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub skip: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub length: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub checkpoint: i64,
    /// Fixed point, 0..=10000 for 0..=100.00%.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub progress: i64,
    #[serde(default)]
    pub dispatch_time: i64,
    /// 0 until the agent first reports back.
    #[serde(default)]
    pub solve_time: i64,
    #[serde(default)]
    pub state: i64,
    #[serde(default)]
    pub cracked: i64,
    /// Instantaneous hashes per second.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub speed: i64,
    /// Present only when the backend expanded `task`.
    #[serde(default, deserialize_with = "optional_one")]
    pub task: Option<Task>,
}

impl Chunk {
    /// Progress reached 100% (or beyond).
    pub fn is_complete(&self) -> bool {
        self.progress >= PROGRESS_COMPLETE
    }

    /// Most recent activity timestamp.
    pub fn last_activity(&self) -> i64 {
        self.solve_time.max(self.dispatch_time)
    }

    /// Keyspace actually walked inside this chunk.
    pub fn searched(&self) -> i64 {
        self.checkpoint - self.skip
    }

    pub fn state(&self) -> Option<ChunkState> {
        ChunkState::from_code(self.state)
    }

    /// Still being worked on as of `now_secs`, given the activity window.
    pub fn is_active(&self, window_secs: i64, now_secs: i64) -> bool {
        now_secs - self.last_activity() < window_secs && !self.is_complete()
    }
}

/// Per-task aggregate derived from its chunks. Never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ChunkData {
    /// Fraction of keyspace in completed chunks.
    pub dispatched: f64,
    /// Fraction of keyspace walked (sum of checkpoint - skip).
    pub searched: f64,
    pub cracked: i64,
    /// Hashes per second of the chunks still being worked on.
    pub speed: i64,
}
