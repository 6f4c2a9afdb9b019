//! List Query Builder
//!
//! Builds the query parameters accepted by the backend list endpoints:
//! `maxResults`, `filter` and `expand`.
//!
//! The filter mini-language is a comma separated list of `field=value`
//! equality clauses, all of which must hold. The console only ever
//! constructs these expressions; parsing is the backend's job.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One `field=value` equality clause.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterClause {
    pub field: String,
    pub value: String,
}

impl FilterClause {
    pub fn eq(field: impl Into<String>, value: impl ToString) -> Self {
        Self {
            field: field.into(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field, self.value)
    }
}

/// Query parameters for a list request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListQuery {
    pub max_results: Option<u32>,
    pub filter: Vec<FilterClause>,
    pub expand: Vec<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the page size.
    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Add an equality clause. Clauses are AND-ed.
    pub fn filter_eq(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.filter.push(FilterClause::eq(field, value));
        self
    }

    /// Ask the backend to embed a related resource.
    pub fn expand(mut self, name: impl Into<String>) -> Self {
        self.expand.push(name.into());
        self
    }

    /// Render the filter clauses, e.g. `isArchived=false,taskId=4`.
    pub fn filter_expression(&self) -> String {
        self.filter
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Render the expand list, e.g. `hashlist,assignedAgents`.
    pub fn expand_expression(&self) -> String {
        self.expand.join(",")
    }

    /// Key/value pairs to send on the wire. Empty expressions are omitted.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(max) = self.max_results {
            pairs.push(("maxResults", max.to_string()));
        }
        let filter = self.filter_expression();
        if !filter.is_empty() {
            pairs.push(("filter", filter));
        }
        let expand = self.expand_expression();
        if !expand.is_empty() {
            pairs.push(("expand", expand));
        }
        pairs
    }
}
