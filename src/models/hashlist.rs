//! Hashlist Model

use serde::{Deserialize, Serialize};

/// Target hash set joined onto tasks for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Hashlist {
    #[serde(rename = "_id", default)]
    pub id: i64,
    pub hashlist_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hash_count: i64,
    #[serde(default)]
    pub cracked: i64,
    #[serde(default)]
    pub is_secret: bool,
    #[serde(default)]
    pub is_archived: bool,
}

impl Hashlist {
    /// Every hash in the list has been recovered.
    pub fn is_fully_cracked(&self) -> bool {
        self.hash_count > 0 && self.cracked >= self.hash_count
    }
}
