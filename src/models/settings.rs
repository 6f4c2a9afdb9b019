//! Settings Models
//!
//! Console configuration and the explicit aggregator settings derived from it.

use serde::{Deserialize, Serialize};

/// Console configuration stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsoleConfig {
    /// Backend API base URL (e.g. "http://localhost:8080/api/v2")
    pub api_url: String,
    /// Bearer token. Never written to disk.
    #[serde(skip_serializing, default)]
    pub api_token: Option<String>,
    /// A chunk counts toward current speed only if it was active within
    /// this many seconds
    #[serde(default = "default_chunk_time_window_secs")]
    pub chunk_time_window_secs: i64,
    /// Page size used when fetching every chunk of a task or agent
    #[serde(default = "default_max_results_cap")]
    pub max_results_cap: u32,
    /// Page size used by table list loads
    #[serde(default = "default_list_max_results")]
    pub list_max_results: u32,
    /// Timestamp format tokens: dd, MM, yyyy, h, mm, ss
    #[serde(default = "default_time_format")]
    pub time_format: String,
    /// Upper bound of memoized rows per derivation
    #[serde(default = "default_row_cache_capacity")]
    pub row_cache_capacity: u64,
    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_chunk_time_window_secs() -> i64 {
    600
}

fn default_max_results_cap() -> u32 {
    50_000
}

fn default_list_max_results() -> u32 {
    1000
}

fn default_time_format() -> String {
    "dd/MM/yyyy h:mm:ss".to_string()
}

fn default_row_cache_capacity() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api/v2".to_string(),
            api_token: None,
            chunk_time_window_secs: default_chunk_time_window_secs(),
            max_results_cap: default_max_results_cap(),
            list_max_results: default_list_max_results(),
            time_format: default_time_format(),
            row_cache_capacity: default_row_cache_capacity(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConsoleConfigUpdate {
    pub api_url: Option<String>,
    pub chunk_time_window_secs: Option<i64>,
    pub max_results_cap: Option<u32>,
    pub list_max_results: Option<u32>,
    pub time_format: Option<String>,
    pub row_cache_capacity: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

impl ConsoleConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: ConsoleConfigUpdate) {
        if let Some(api_url) = update.api_url {
            self.api_url = api_url;
        }
        if let Some(window) = update.chunk_time_window_secs {
            self.chunk_time_window_secs = window;
        }
        if let Some(cap) = update.max_results_cap {
            self.max_results_cap = cap;
        }
        if let Some(max) = update.list_max_results {
            self.list_max_results = max;
        }
        if let Some(fmt) = update.time_format {
            self.time_format = fmt;
        }
        if let Some(capacity) = update.row_cache_capacity {
            self.row_cache_capacity = capacity;
        }
        if let Some(timeout) = update.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(format!(
                "Invalid api_url: {}. Must start with http:// or https://",
                self.api_url
            ));
        }

        if self.chunk_time_window_secs <= 0 {
            return Err("chunk_time_window_secs must be positive".to_string());
        }

        if self.max_results_cap == 0 || self.list_max_results == 0 {
            return Err("max results settings must be at least 1".to_string());
        }

        if self.row_cache_capacity == 0 {
            return Err("row_cache_capacity must be at least 1".to_string());
        }

        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be at least 1".to_string());
        }

        Ok(())
    }

    /// Settings the chunk aggregator needs, passed explicitly.
    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            chunk_time_window_secs: self.chunk_time_window_secs,
            max_results_cap: self.max_results_cap,
        }
    }
}

/// Explicit aggregator settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregatorConfig {
    pub chunk_time_window_secs: i64,
    pub max_results_cap: u32,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        ConsoleConfig::default().aggregator_config()
    }
}
