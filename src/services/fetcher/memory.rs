//! In-Memory Entity Fetcher
//!
//! Serves canned JSON records per resource and evaluates the equality filter
//! clauses and `maxResults` the way the backend does. Individual resources
//! can be made to fail, and the next calls can be delayed, which is enough to
//! reproduce partial outages and out-of-order completions.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use hashtopolis_console_core::{
    CoreError, CoreResult, EntityFetcher, FilterClause, ListQuery, ListResponse, Resource,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Default)]
struct State {
    records: HashMap<Resource, Vec<Value>>,
    failing: HashSet<Resource>,
    delays: HashMap<Resource, VecDeque<Duration>>,
    calls: HashMap<Resource, usize>,
    queries: Vec<(Resource, ListQuery)>,
}

/// Fetcher over in-process fixtures.
#[derive(Default)]
pub struct InMemoryFetcher {
    state: Mutex<State>,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `set_records`.
    pub fn with_records<T: Serialize>(self, resource: Resource, records: &[T]) -> Self {
        self.set_records(resource, records);
        self
    }

    /// Replace the records served for a resource. Records that fail to
    /// serialize are skipped.
    pub fn set_records<T: Serialize>(&self, resource: Resource, records: &[T]) {
        let values: Vec<Value> = records
            .iter()
            .filter_map(|r| serde_json::to_value(r).ok())
            .collect();
        self.lock().records.insert(resource, values);
    }

    /// Make every call for `resource` fail until `recover` is called.
    pub fn fail(&self, resource: Resource) {
        self.lock().failing.insert(resource);
    }

    pub fn recover(&self, resource: Resource) {
        self.lock().failing.remove(&resource);
    }

    /// Delay the next call for `resource`. Delays queue up per resource.
    pub fn delay_next(&self, resource: Resource, delay: Duration) {
        self.lock()
            .delays
            .entry(resource)
            .or_default()
            .push_back(delay);
    }

    /// Number of `get_all` calls made for `resource`.
    pub fn call_count(&self, resource: Resource) -> usize {
        self.lock().calls.get(&resource).copied().unwrap_or(0)
    }

    /// Every query received, in arrival order.
    pub fn queries(&self) -> Vec<(Resource, ListQuery)> {
        self.lock().queries.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Render a JSON scalar the way it appears in a filter expression.
fn filter_repr(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn matches_clause(record: &Value, clause: &FilterClause) -> bool {
    record
        .get(&clause.field)
        .and_then(filter_repr)
        .is_some_and(|v| v == clause.value)
}

#[async_trait]
impl EntityFetcher for InMemoryFetcher {
    async fn get_all(
        &self,
        resource: Resource,
        query: &ListQuery,
    ) -> CoreResult<ListResponse<Value>> {
        let (delay, failing) = {
            let mut state = self.lock();
            *state.calls.entry(resource).or_insert(0) += 1;
            state.queries.push((resource, query.clone()));
            let delay = state.delays.get_mut(&resource).and_then(VecDeque::pop_front);
            (delay, state.failing.contains(&resource))
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if failing {
            return Err(CoreError::fetch(format!("{} unavailable", resource)));
        }

        let matching: Vec<Value> = {
            let state = self.lock();
            state
                .records
                .get(&resource)
                .map(|records| {
                    records
                        .iter()
                        .filter(|r| query.filter.iter().all(|c| matches_clause(r, c)))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };

        let total = matching.len() as u64;
        let max = query.max_results.map(u64::from).unwrap_or(total);
        let values: Vec<Value> = matching.into_iter().take(max as usize).collect();

        Ok(ListResponse {
            is_last: values.len() as u64 == total,
            max_results: max,
            start_at: 0,
            total,
            values,
        })
    }
}
