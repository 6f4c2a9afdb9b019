//! Entity Fetcher Trait
//!
//! The seam between the console's aggregation logic and the backend API.
//! Implementations live in the application crate (HTTP, in-memory).

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CoreResult;
use crate::query::ListQuery;
use crate::resource::Resource;
use crate::response::ListResponse;

/// Fetches one page of raw entity records from a backend collection.
///
/// Retry policy, if any, belongs to the implementation.
#[async_trait]
pub trait EntityFetcher: Send + Sync {
    async fn get_all(&self, resource: Resource, query: &ListQuery)
        -> CoreResult<ListResponse<Value>>;
}

/// Fetch a page and decode it into typed entities.
pub async fn fetch_typed<T: DeserializeOwned>(
    fetcher: &dyn EntityFetcher,
    resource: Resource,
    query: &ListQuery,
) -> CoreResult<ListResponse<T>> {
    fetcher.get_all(resource, query).await?.decode()
}
