//! Subcommand implementations.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use rfq_search::criteria::{
    NotificationCriteria, QuoteMessageCriteria, SearchCriteria, Sorting, SubmissionCriteria,
    SubmissionQuoteCriteria, UserCriteria,
};
use rfq_search::documents::Projection;
use rfq_search::elasticsearch::ElasticsearchClient;
use rfq_search::indexing::{RebuildOrchestrator, RebuildOutcome, RebuildTracker};
use rfq_search::model::{Notification, QuoteMessage, Submission, SubmissionQuote, User};
use rfq_search::EntityKind;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::info;

use crate::snapshot::SnapshotRepository;

/// Paging, sorting and text options of the `search` command.
#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    pub query: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub criteria: Option<String>,
}

/// Fails unless the cluster answers its health check.
pub async fn health(client: &ElasticsearchClient) -> anyhow::Result<()> {
    client
        .health_check()
        .await
        .context("Elasticsearch health check failed")?;
    info!(nodes = ?client.config().nodes, "Elasticsearch is available");
    println!("ok");
    Ok(())
}

/// Creates every missing index. Fails if any index could not be ensured.
pub async fn ensure_indexes(client: &ElasticsearchClient) -> anyhow::Result<()> {
    let mut missing = Vec::new();
    for kind in EntityKind::ALL {
        let index = client.resolver().index_for_kind(kind);
        if client.ensure_index(&index).await {
            println!("{}", index);
        } else {
            missing.push(index);
        }
    }

    if !missing.is_empty() {
        anyhow::bail!("could not ensure indexes: {}", missing.join(", "));
    }
    Ok(())
}

/// Rebuilds the index of `kind` from a snapshot file and returns the outcome.
pub async fn rebuild(
    client: &ElasticsearchClient,
    kind: EntityKind,
    snapshot: &Path,
) -> anyhow::Result<RebuildOutcome> {
    let outcome = match kind {
        EntityKind::User => rebuild_from::<User>(client, kind, snapshot).await?,
        EntityKind::Submission => rebuild_from::<Submission>(client, kind, snapshot).await?,
        EntityKind::SubmissionQuote => {
            rebuild_from::<SubmissionQuote>(client, kind, snapshot).await?
        }
        EntityKind::QuoteMessage => rebuild_from::<QuoteMessage>(client, kind, snapshot).await?,
        EntityKind::Notification => rebuild_from::<Notification>(client, kind, snapshot).await?,
    };
    Ok(outcome)
}

async fn rebuild_from<E>(
    client: &ElasticsearchClient,
    kind: EntityKind,
    snapshot: &Path,
) -> anyhow::Result<RebuildOutcome>
where
    E: Projection + Clone + DeserializeOwned,
{
    let repository = SnapshotRepository::<E>::load(kind.as_str(), snapshot).await?;
    info!(
        entity = repository.entity(),
        rows = repository.len(),
        snapshot = %snapshot.display(),
        "Loaded snapshot"
    );

    let orchestrator = RebuildOrchestrator::new(
        kind,
        Arc::new(client.clone()),
        Arc::new(repository),
        RebuildTracker::new(),
    );
    Ok(orchestrator.rebuild().await)
}

/// Searches the index of `kind` and returns the page as JSON.
pub async fn search(
    client: &ElasticsearchClient,
    kind: EntityKind,
    args: &SearchArgs,
) -> anyhow::Result<Value> {
    match kind {
        EntityKind::User => search_with::<UserCriteria>(client, args).await,
        EntityKind::Submission => search_with::<SubmissionCriteria>(client, args).await,
        EntityKind::SubmissionQuote => search_with::<SubmissionQuoteCriteria>(client, args).await,
        EntityKind::QuoteMessage => search_with::<QuoteMessageCriteria>(client, args).await,
        EntityKind::Notification => search_with::<NotificationCriteria>(client, args).await,
    }
}

async fn search_with<C>(client: &ElasticsearchClient, args: &SearchArgs) -> anyhow::Result<Value>
where
    C: SearchCriteria + DeserializeOwned,
    C::SortField: Serialize,
{
    let criteria: C = build_criteria(args)?;
    let page = client.search(&criteria).await?;
    Ok(serde_json::to_value(page)?)
}

/// Merges the command line options over the `--criteria` JSON object.
fn build_criteria<C>(args: &SearchArgs) -> anyhow::Result<C>
where
    C: SearchCriteria + DeserializeOwned,
    C::SortField: Serialize,
{
    let mut object = match args.criteria.as_deref() {
        Some(raw) => match serde_json::from_str::<Value>(raw).context("invalid --criteria")? {
            Value::Object(map) => map,
            other => anyhow::bail!("--criteria must be a JSON object, got {}", other),
        },
        None => Map::new(),
    };

    if let Some(query) = &args.query {
        object.insert("query".to_string(), Value::String(query.clone()));
    }

    if args.page.is_some() || args.page_size.is_some() {
        let paging = object
            .entry("paging")
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(paging) = paging else {
            anyhow::bail!("--criteria paging must be a JSON object");
        };
        if let Some(page) = args.page {
            paging.insert("pageNumber".to_string(), Value::from(page));
        }
        if let Some(page_size) = args.page_size {
            paging.insert("pageSize".to_string(), Value::from(page_size));
        }
    }

    if let Some(field) = &args.sort {
        let sorting = Sorting::<C::SortField>::parse(field, args.order.as_deref())?;
        object.insert("sorting".to_string(), serde_json::to_value(sorting)?);
    }

    serde_json::from_value(Value::Object(object)).context("invalid search criteria")
}
