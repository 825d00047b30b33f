//! Command line configuration for the operator CLI.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RFQ_SEARCH_NODES` | http://localhost:9200 | Engine node URLs (comma-separated) |
//! | `RFQ_SEARCH_INDEX_PREFIX` | rfq | Index name prefix |
//! | `RFQ_SEARCH_USERNAME` | (none) | Basic auth username |
//! | `RFQ_SEARCH_PASSWORD` | (none) | Basic auth password |
//! | `RFQ_LOG_LEVEL` | info | Log level |

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rfq_search::EntityKind;
use rfq_search::config::{SearchAuth, SearchConfig};

/// Operator CLI for the marketplace search indexes.
#[derive(Debug, Clone, Parser)]
#[command(name = "rfq-admin")]
#[command(about = "Inspect, create, rebuild and query the RFQ search indexes")]
pub struct Cli {
    /// Engine node URLs (comma-separated).
    #[arg(
        long,
        env = "RFQ_SEARCH_NODES",
        default_value = "http://localhost:9200",
        global = true
    )]
    pub nodes: String,

    /// Index name prefix.
    #[arg(long, env = "RFQ_SEARCH_INDEX_PREFIX", default_value = "rfq", global = true)]
    pub index_prefix: String,

    /// Username for basic authentication.
    #[arg(long, env = "RFQ_SEARCH_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password for basic authentication.
    #[arg(long, env = "RFQ_SEARCH_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "RFQ_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Operator commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Checks cluster health. Exits non-zero when the engine is unavailable.
    Health,

    /// Creates every missing index.
    EnsureIndexes,

    /// Rebuilds one index from a JSON snapshot of the store.
    Rebuild {
        /// Entity whose index is rebuilt.
        entity: EntityKind,

        /// JSON file holding an array of entities.
        #[arg(long)]
        snapshot: PathBuf,
    },

    /// Runs a search and prints the page as JSON.
    Search {
        /// Entity to search.
        entity: EntityKind,

        /// Free-text query.
        #[arg(short, long)]
        query: Option<String>,

        /// 1-based page number (default: 1).
        #[arg(long)]
        page: Option<u32>,

        /// Items per page (default: the configured default page size).
        #[arg(long)]
        page_size: Option<u32>,

        /// Field to sort on.
        #[arg(long)]
        sort: Option<String>,

        /// Sort order (asc or desc).
        #[arg(long, requires = "sort")]
        order: Option<String>,

        /// Extra criteria as a JSON object, e.g. '{"categoryIds":[1]}'.
        #[arg(long)]
        criteria: Option<String>,
    },
}

impl Cli {
    /// Builds the search configuration from the global arguments.
    pub fn search_config(&self) -> SearchConfig {
        let nodes = self
            .nodes
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let auth = match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(SearchAuth::Basic {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        };

        SearchConfig {
            nodes,
            index_prefix: self.index_prefix.clone(),
            auth,
            ..Default::default()
        }
    }
}
