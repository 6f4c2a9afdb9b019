//! Backend Resource Catalogue
//!
//! The list collections the console reads from the backend API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A backend collection that supports the generic list endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Agents,
    AgentStats,
    Tasks,
    TaskWrappers,
    Chunks,
    Hashlists,
    Users,
    AccessGroups,
}

impl Resource {
    /// All resources, in a stable order.
    pub const ALL: [Resource; 8] = [
        Resource::Agents,
        Resource::AgentStats,
        Resource::Tasks,
        Resource::TaskWrappers,
        Resource::Chunks,
        Resource::Hashlists,
        Resource::Users,
        Resource::AccessGroups,
    ];

    /// List endpoint path relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Agents => "/ui/agents",
            Self::AgentStats => "/ui/agentstats",
            Self::Tasks => "/ui/tasks",
            Self::TaskWrappers => "/ui/taskwrappers",
            Self::Chunks => "/ui/chunks",
            Self::Hashlists => "/ui/hashlists",
            Self::Users => "/ui/users",
            Self::AccessGroups => "/ui/accessgroups",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agents => write!(f, "agents"),
            Self::AgentStats => write!(f, "agentstats"),
            Self::Tasks => write!(f, "tasks"),
            Self::TaskWrappers => write!(f, "taskwrappers"),
            Self::Chunks => write!(f, "chunks"),
            Self::Hashlists => write!(f, "hashlists"),
            Self::Users => write!(f, "users"),
            Self::AccessGroups => write!(f, "accessgroups"),
        }
    }
}
