//! Agent Models
//!
//! Workers executing cracking chunks, their periodic device statistics, and
//! the owner/access-group references embedded on them.

use serde::{Deserialize, Serialize};

use super::serde_helpers::{one_or_many, optional_one};

/// Owning user reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// Access group reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AccessGroup {
    #[serde(rename = "_id", default)]
    pub id: i64,
    #[serde(default)]
    pub group_name: String,
}

/// Kind of device statistic an agent reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AgentStatType {
    GpuTemperature,
    GpuUtilization,
    CpuUtilization,
}

impl AgentStatType {
    /// Map the backend's integer code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::GpuTemperature),
            2 => Some(Self::GpuUtilization),
            3 => Some(Self::CpuUtilization),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::GpuTemperature => 1,
            Self::GpuUtilization => 2,
            Self::CpuUtilization => 3,
        }
    }
}

/// One statistics sample: one value per device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AgentStat {
    #[serde(rename = "_id", default)]
    pub id: i64,
    #[serde(default)]
    pub agent_stat_id: i64,
    pub agent_id: i64,
    pub stat_type: i64,
    pub time: i64,
    #[serde(default)]
    pub value: Vec<i64>,
}

impl AgentStat {
    pub fn kind(&self) -> Option<AgentStatType> {
        AgentStatType::from_code(self.stat_type)
    }
}

/// A worker registered with the cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[serde(rename = "_id", default)]
    pub id: i64,
    #[serde(default)]
    pub agent_id: i64,
    #[serde(default)]
    pub agent_name: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub os: i64,
    #[serde(default)]
    pub devices: String,
    #[serde(default)]
    pub cmd_pars: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_trusted: bool,
    #[serde(default)]
    pub last_act: String,
    #[serde(default)]
    pub last_time: i64,
    #[serde(default)]
    pub last_ip: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default, deserialize_with = "optional_one")]
    pub user: Option<User>,
    #[serde(default)]
    pub cpu_only: i64,
    #[serde(default)]
    pub client_signature: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub access_groups: Vec<AccessGroup>,
    #[serde(default, rename = "agentstats", deserialize_with = "one_or_many")]
    pub agent_stats: Vec<AgentStat>,
}

impl Agent {
    /// Primary key. Older payloads only carry `agentId`.
    pub fn key(&self) -> i64 {
        if self.id != 0 {
            self.id
        } else {
            self.agent_id
        }
    }
}
