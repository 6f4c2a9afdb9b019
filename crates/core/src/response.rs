//! List Response Envelope
//!
//! Wrapper returned by every backend list endpoint.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreResult;

/// A page of entities plus paging metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub values: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub start_at: u64,
    #[serde(default)]
    pub max_results: u64,
    #[serde(default)]
    pub is_last: bool,
}

impl<T> ListResponse<T> {
    /// Build a single, complete page.
    pub fn single_page(values: Vec<T>) -> Self {
        let total = values.len() as u64;
        Self {
            values,
            total,
            start_at: 0,
            max_results: total,
            is_last: true,
        }
    }
}

impl ListResponse<Value> {
    /// Convert raw JSON records into typed entities, keeping the paging metadata.
    pub fn decode<T: DeserializeOwned>(self) -> CoreResult<ListResponse<T>> {
        let values = self
            .values
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(ListResponse {
            values,
            total: self.total,
            start_at: self.start_at,
            max_results: self.max_results,
            is_last: self.is_last,
        })
    }
}
