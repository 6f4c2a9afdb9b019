//! HTTP Entity Fetcher
//!
//! Calls the backend list endpoints with reqwest. One request per call; no
//! retries.

use std::time::Duration;

use async_trait::async_trait;
use hashtopolis_console_core::{
    CoreError, CoreResult, EntityFetcher, ListQuery, ListResponse, Resource,
};
use serde_json::Value;

use crate::models::settings::ConsoleConfig;
use crate::utils::error::{AppError, AppResult};

/// Fetcher backed by a persistent reqwest client.
pub struct HttpEntityFetcher {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpEntityFetcher {
    /// Build a fetcher from the console configuration.
    pub fn new(config: &ConsoleConfig) -> AppResult<Self> {
        config.validate().map_err(AppError::validation)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("hashtopolis-console/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    /// Full URL of a resource's list endpoint.
    pub fn endpoint(&self, resource: Resource) -> String {
        format!("{}{}", self.base_url, resource.path())
    }
}

#[async_trait]
impl EntityFetcher for HttpEntityFetcher {
    async fn get_all(
        &self,
        resource: Resource,
        query: &ListQuery,
    ) -> CoreResult<ListResponse<Value>> {
        let url = self.endpoint(resource);
        tracing::debug!(
            "[HttpFetcher] GET {} filter='{}' expand='{}'",
            url,
            query.filter_expression(),
            query.expand_expression()
        );

        let mut request = self.client.get(&url).query(&query.to_query_pairs());
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CoreError::fetch(format!("{}: {}", resource, e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::fetch(format!(
                "{} returned HTTP {}: {}",
                resource, status, body
            )));
        }

        response
            .json::<ListResponse<Value>>()
            .await
            .map_err(|e| CoreError::fetch(format!("{}: invalid list response: {}", resource, e)))
    }
}

impl std::fmt::Debug for HttpEntityFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEntityFetcher")
            .field("base_url", &self.base_url)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}
