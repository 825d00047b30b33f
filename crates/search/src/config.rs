//! Search engine configuration.
//!
//! Every field except `nodes` has a serde default, so a partial JSON or
//! environment-derived document is enough to build a [`SearchConfig`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Credentials sent with every engine request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SearchAuth {
    /// HTTP basic auth.
    Basic {
        /// Login name.
        username: String,
        /// Password.
        password: String,
    },
    /// An API or service token.
    Bearer {
        /// Token value.
        token: String,
    },
}

/// Connection, index settings and query limits for the marketplace indexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Engine URLs. Only the first is dialled.
    pub nodes: Vec<String>,

    /// Prepended to every index name, e.g. `rfq_submissions` (default: `"rfq"`).
    #[serde(default = "default_index_prefix")]
    pub index_prefix: String,

    /// Primary shards of a newly created index (default: 1).
    #[serde(default = "default_shards")]
    pub number_of_shards: u32,

    /// Replicas of a newly created index (default: 1).
    #[serde(default = "default_replicas")]
    pub number_of_replicas: u32,

    /// `index.refresh_interval` of a newly created index (default: "1s").
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: String,

    /// `index.max_result_window`; bounds `from + size` of any search (default: 10000).
    #[serde(default = "default_max_result_window")]
    pub max_result_window: u32,

    /// Per-request timeout in milliseconds (default: 30000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Credentials, if the cluster is secured.
    #[serde(default)]
    pub auth: Option<SearchAuth>,

    /// Accept any TLS certificate. Local clusters only.
    #[serde(default)]
    pub disable_certificate_validation: bool,

    /// Health checks attempted before giving up on index creation (default: 5).
    #[serde(default = "default_availability_check_attempts")]
    pub availability_check_attempts: u32,

    /// Fixed delay between health checks in milliseconds (default: 5000).
    #[serde(default = "default_availability_check_delay_ms")]
    pub availability_check_delay_ms: u64,

    /// Documents per bulk request (default: 500).
    #[serde(default = "default_bulk_batch_size")]
    pub bulk_batch_size: usize,

    /// Page size used when criteria carry none (default: 10).
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Largest page a single search may request (default: 100).
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

fn default_index_prefix() -> String {
    "rfq".to_string()
}

fn default_shards() -> u32 {
    1
}

fn default_replicas() -> u32 {
    1
}

fn default_refresh_interval() -> String {
    "1s".to_string()
}

fn default_max_result_window() -> u32 {
    10000
}

fn default_request_timeout_ms() -> u64 {
    30000
}

fn default_availability_check_attempts() -> u32 {
    5
}

fn default_availability_check_delay_ms() -> u64 {
    5000
}

fn default_bulk_batch_size() -> usize {
    500
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            nodes: vec!["http://localhost:9200".to_string()],
            index_prefix: default_index_prefix(),
            number_of_shards: default_shards(),
            number_of_replicas: default_replicas(),
            refresh_interval: default_refresh_interval(),
            max_result_window: default_max_result_window(),
            request_timeout_ms: default_request_timeout_ms(),
            auth: None,
            disable_certificate_validation: false,
            availability_check_attempts: default_availability_check_attempts(),
            availability_check_delay_ms: default_availability_check_delay_ms(),
            bulk_batch_size: default_bulk_batch_size(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl SearchConfig {
    /// Returns the delay between availability checks.
    pub fn availability_check_delay(&self) -> Duration {
        Duration::from_millis(self.availability_check_delay_ms)
    }

    /// Returns the per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.nodes.iter().all(|n| n.trim().is_empty()) {
            errors.push("At least one search node is required".to_string());
        }

        if self.availability_check_attempts == 0 {
            errors.push("Availability check attempts cannot be 0".to_string());
        }

        if self.bulk_batch_size == 0 {
            errors.push("Bulk batch size cannot be 0".to_string());
        }

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if self.max_page_size > self.max_result_window {
            errors.push("Max page size cannot exceed the max result window".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
