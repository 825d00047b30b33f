//! RFQ search operator CLI.
//!
//! Checks engine health, creates indexes, rebuilds an index from a JSON
//! snapshot of the store and runs ad-hoc searches.

mod cli;
mod commands;
mod snapshot;

use clap::Parser;
use rfq_search::elasticsearch::ElasticsearchClient;
use tracing::info;

use crate::cli::{Cli, Command};
use crate::commands::SearchArgs;

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rfq_admin={0},rfq_search={0}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = cli.search_config();
    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        nodes = ?config.nodes,
        index_prefix = %config.index_prefix,
        "Connecting to Elasticsearch"
    );
    let client = ElasticsearchClient::new(config)?;

    match cli.command {
        Command::Health => commands::health(&client).await?,
        Command::EnsureIndexes => commands::ensure_indexes(&client).await?,
        Command::Rebuild { entity, snapshot } => {
            let outcome = commands::rebuild(&client, entity, &snapshot).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if !outcome.is_success() {
                std::process::exit(2);
            }
        }
        Command::Search {
            entity,
            query,
            page,
            page_size,
            sort,
            order,
            criteria,
        } => {
            let args = SearchArgs {
                query,
                page,
                page_size,
                sort,
                order,
                criteria,
            };
            let page = commands::search(&client, entity, &args).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
    }

    Ok(())
}
