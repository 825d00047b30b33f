//! Elasticsearch integration tests.
//!
//! These tests run against a real Elasticsearch started in Docker via
//! testcontainers, so the whole file is gated behind the `es-integration`
//! feature.
//!
//! Run with: `cargo test -p rfq-search --features es-integration --test elasticsearch_tests`

#![cfg(feature = "es-integration")]

mod common;

mod es_integration {
    use std::sync::Arc;

    use testcontainers::ImageExt;
    use testcontainers::runners::AsyncRunner;
    use testcontainers_modules::elastic_search::ElasticSearch;
    use tokio::sync::OnceCell;

    use rfq_search::EntityKind;
    use rfq_search::core::DocumentIndex;
    use rfq_search::criteria::{
        SortOrder, SubmissionCriteria, SubmissionSortField, Sorting, UserCriteria,
    };
    use rfq_search::documents::{Projection, SubmissionDocument};
    use rfq_search::elasticsearch::ElasticsearchClient;
    use rfq_search::error::SortError;
    use rfq_search::indexing::{RebuildOrchestrator, RebuildStatus, RebuildTracker};
    use rfq_search::model::Submission;
    use rfq_search::{Paging, SearchConfig};

    use super::common::{InMemoryRepository, customer, submission};

    /// Shared Elasticsearch container reused across all tests in this module.
    struct SharedEs {
        host: String,
        port: u16,
        /// Kept alive for the duration of the test binary; dropped at process exit.
        _container: testcontainers::ContainerAsync<ElasticSearch>,
    }

    static SHARED_ES: OnceCell<SharedEs> = OnceCell::const_new();

    async fn shared_es() -> &'static SharedEs {
        SHARED_ES
            .get_or_init(|| async {
                let container = ElasticSearch::default()
                    .with_env_var("ES_JAVA_OPTS", "-Xms256m -Xmx256m")
                    .with_startup_timeout(std::time::Duration::from_secs(120))
                    .start()
                    .await
                    .expect("Failed to start Elasticsearch container");

                let port = container
                    .get_host_port_ipv4(9200)
                    .await
                    .expect("Failed to get host port");

                let host = container
                    .get_host()
                    .await
                    .expect("Failed to get host")
                    .to_string();

                SharedEs {
                    host,
                    port,
                    _container: container,
                }
            })
            .await
    }

    /// Creates a client on the shared container with a unique index prefix,
    /// so tests are isolated without separate containers.
    async fn create_client() -> ElasticsearchClient {
        let es = shared_es().await;
        let unique_prefix = format!("rfq_{}", uuid::Uuid::new_v4().simple());

        let config = SearchConfig {
            nodes: vec![format!("http://{}:{}", es.host, es.port)],
            index_prefix: unique_prefix,
            number_of_replicas: 0,
            refresh_interval: "1ms".to_string(),
            availability_check_attempts: 10,
            availability_check_delay_ms: 1000,
            ..Default::default()
        };

        ElasticsearchClient::new(config).expect("Failed to create client")
    }

    async fn index_submissions(client: &ElasticsearchClient, submissions: &[Submission]) {
        assert!(DocumentIndex::<SubmissionDocument>::ensure_index_exists(client).await);
        let docs: Vec<SubmissionDocument> = submissions.iter().map(Projection::project).collect();
        let outcome = client.index_and_refresh_many(&docs).await.unwrap();
        assert_eq!(outcome.indexed, docs.len());
        assert_eq!(outcome.failed, 0);
    }

    fn by_ids(ids: Vec<i64>) -> SubmissionCriteria {
        SubmissionCriteria {
            ids,
            ..Default::default()
        }
    }

    fn ids_of(docs: &[SubmissionDocument]) -> Vec<i64> {
        docs.iter().map(|d| d.id).collect()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    #[tokio::test]
    async fn es_integration_health_check() {
        let client = create_client().await;
        assert!(client.health_check().await.is_ok());
        assert!(client.wait_until_available().await);
    }

    #[tokio::test]
    async fn es_integration_ensure_index_is_idempotent() {
        let client = create_client().await;
        let index = client.index_for::<SubmissionDocument>();

        assert!(!client.index_exists(&index).await.unwrap());
        assert!(client.ensure_index(&index).await);
        assert!(client.ensure_index(&index).await);
        assert!(client.index_exists(&index).await.unwrap());

        client.delete_index(&index).await.unwrap();
        assert!(!client.index_exists(&index).await.unwrap());
        // Deleting a missing index is fine.
        client.delete_index(&index).await.unwrap();
    }

    // ========================================================================
    // Writes
    // ========================================================================

    #[tokio::test]
    async fn es_integration_index_and_refresh_round_trip() {
        let client = create_client().await;
        assert!(DocumentIndex::<SubmissionDocument>::ensure_index_exists(&client).await);

        let doc = submission(42, "Fix my roof", "Roofing repair needed", &[1, 2]).project();
        client.index_and_refresh(&doc).await.unwrap();

        let page = client.search(&by_ids(vec![42])).await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items, vec![doc]);
    }

    #[tokio::test]
    async fn es_integration_upsert_replaces_document() {
        let client = create_client().await;
        index_submissions(&client, &[submission(1, "First title", "", &[])]).await;

        let updated = submission(1, "Second title", "", &[]).project();
        client.index_and_refresh(&updated).await.unwrap();

        let page = client.search(&SubmissionCriteria::default()).await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].title, "Second title");
    }

    #[tokio::test]
    async fn es_integration_delete_and_refresh() {
        let client = create_client().await;
        index_submissions(
            &client,
            &[submission(1, "Keep", "", &[]), submission(2, "Drop", "", &[])],
        )
        .await;

        DocumentIndex::<SubmissionDocument>::delete_and_refresh(&client, 2)
            .await
            .unwrap();
        // Absent stays absent.
        DocumentIndex::<SubmissionDocument>::delete_and_refresh(&client, 2)
            .await
            .unwrap();

        let page = client.search(&SubmissionCriteria::default()).await.unwrap();
        assert_eq!(ids_of(&page.items), vec![1]);
    }

    #[tokio::test]
    async fn es_integration_index_becomes_visible_after_refresh() {
        let client = create_client().await;
        assert!(DocumentIndex::<SubmissionDocument>::ensure_index_exists(&client).await);
        let index = client.index_for::<SubmissionDocument>();

        let doc = submission(5, "Paint fence", "", &[2]).project();
        client.index(&doc).await.unwrap();
        client.refresh_index(&index).await.unwrap();

        let page = client.search(&by_ids(vec![5])).await.unwrap();
        assert_eq!(page.items, vec![doc]);
    }

    #[tokio::test]
    async fn es_integration_index_many_becomes_visible_after_refresh() {
        let client = create_client().await;
        assert!(DocumentIndex::<SubmissionDocument>::ensure_index_exists(&client).await);
        let index = client.index_for::<SubmissionDocument>();

        let docs: Vec<SubmissionDocument> = (1..=4)
            .map(|id| submission(id, "Job", "", &[]).project())
            .collect();
        let outcome = client.index_many(&docs).await.unwrap();
        assert_eq!(outcome.indexed, 4);
        assert_eq!(outcome.failed, 0);

        let empty: Vec<SubmissionDocument> = Vec::new();
        assert_eq!(client.index_many(&empty).await.unwrap().indexed, 0);

        client.refresh_index(&index).await.unwrap();
        let page = client.search(&SubmissionCriteria::default()).await.unwrap();
        assert_eq!(ids_of(&page.items), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn es_integration_delete_becomes_visible_after_refresh() {
        let client = create_client().await;
        index_submissions(
            &client,
            &[submission(1, "Keep", "", &[]), submission(2, "Drop", "", &[])],
        )
        .await;
        let index = client.index_for::<SubmissionDocument>();

        DocumentIndex::<SubmissionDocument>::delete(&client, 2)
            .await
            .unwrap();
        // Deleting an id that was never indexed is fine too.
        DocumentIndex::<SubmissionDocument>::delete(&client, 99)
            .await
            .unwrap();
        client.refresh_index(&index).await.unwrap();

        let page = client.search(&SubmissionCriteria::default()).await.unwrap();
        assert_eq!(ids_of(&page.items), vec![1]);
        assert_eq!(page.total_count, 1);
    }

    #[tokio::test]
    async fn es_integration_delete_all_empties_index() {
        let client = create_client().await;
        let submissions: Vec<Submission> = (1..=5)
            .map(|id| submission(id, "Job", "", &[1]))
            .collect();
        index_submissions(&client, &submissions).await;

        let deleted = DocumentIndex::<SubmissionDocument>::delete_all(&client)
            .await
            .unwrap();
        assert_eq!(deleted, 5);

        let page = client.search(&SubmissionCriteria::default()).await.unwrap();
        assert_eq!(page.total_count, 0);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn es_integration_delete_all_on_missing_index() {
        let client = create_client().await;
        let deleted = DocumentIndex::<SubmissionDocument>::delete_all(&client)
            .await
            .unwrap();
        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn es_integration_bulk_is_chunked() {
        let es_client = create_client().await;
        let config = SearchConfig {
            bulk_batch_size: 4,
            ..es_client.config().clone()
        };
        let client = ElasticsearchClient::new(config).unwrap();

        let submissions: Vec<Submission> = (1..=10)
            .map(|id| submission(id, "Job", "", &[]))
            .collect();
        index_submissions(&client, &submissions).await;

        let page = client.search(&SubmissionCriteria::default()).await.unwrap();
        assert_eq!(page.total_count, 10);
    }

    // ========================================================================
    // Search
    // ========================================================================

    #[tokio::test]
    async fn es_integration_search_missing_index_is_empty() {
        let client = create_client().await;
        let page = client.search(&UserCriteria::default()).await.unwrap();
        assert_eq!(page.total_count, 0);
        assert_eq!(page.page_number, 1);
        assert_eq!(page.page_size, 10);
    }

    #[tokio::test]
    async fn es_integration_pagination() {
        let client = create_client().await;
        let submissions: Vec<Submission> = (1..=25)
            .map(|id| submission(id, &format!("Job {}", id), "", &[]))
            .collect();
        index_submissions(&client, &submissions).await;

        let criteria = SubmissionCriteria {
            paging: Paging::new(2, 10),
            sorting: Some(Sorting::new(SubmissionSortField::Id, SortOrder::Asc)),
            ..Default::default()
        };
        let page = client.search(&criteria).await.unwrap();

        assert_eq!(page.total_count, 25);
        assert_eq!(page.items.len(), 10);
        assert_eq!(ids_of(&page.items), (11..=20).collect::<Vec<_>>());

        let last = client
            .search(&SubmissionCriteria {
                paging: Paging::new(3, 10),
                ..criteria
            })
            .await
            .unwrap();
        assert_eq!(ids_of(&last.items), (21..=25).collect::<Vec<_>>());
        assert!(!last.has_next());
    }

    #[tokio::test]
    async fn es_integration_pages_past_result_window_keep_total() {
        let es_client = create_client().await;
        let config = SearchConfig {
            max_result_window: 20,
            max_page_size: 20,
            ..es_client.config().clone()
        };
        let client = ElasticsearchClient::new(config).unwrap();

        let submissions: Vec<Submission> = (1..=25)
            .map(|id| submission(id, "Job", "", &[]))
            .collect();
        index_submissions(&client, &submissions).await;

        let straddling = client
            .search(&SubmissionCriteria {
                paging: Paging::new(2, 15),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(straddling.total_count, 25);
        assert_eq!(ids_of(&straddling.items), (16..=20).collect::<Vec<_>>());

        let beyond = client
            .search(&SubmissionCriteria {
                paging: Paging::new(3, 10),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(beyond.total_count, 25);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.page_number, 3);
    }

    #[tokio::test]
    async fn es_integration_string_sort_is_lexical() {
        let client = create_client().await;
        // Longer than the usual 256 character keyword cut-off.
        let long_title = format!("Masonry {}", "m".repeat(300));
        let titles = [
            "roof repair and gutter cleaning",
            "Roof",
            long_title.as_str(),
            "Bathroom tiles",
            "bathroom tiles",
            "Zinc flashing",
            "ant removal",
        ];
        let submissions: Vec<Submission> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| submission(i as i64 + 1, title, "", &[]))
            .collect();
        index_submissions(&client, &submissions).await;

        let mut expected: Vec<&str> = titles.to_vec();
        expected.sort();

        let asc = client
            .search(&SubmissionCriteria {
                sorting: Some(Sorting::new(SubmissionSortField::Title, SortOrder::Asc)),
                ..Default::default()
            })
            .await
            .unwrap();
        let asc_titles: Vec<&str> = asc.items.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(asc_titles, expected);

        let desc = client
            .search(&SubmissionCriteria {
                sorting: Some(Sorting::new(SubmissionSortField::Title, SortOrder::Desc)),
                ..Default::default()
            })
            .await
            .unwrap();
        let desc_titles: Vec<&str> = desc.items.iter().map(|d| d.title.as_str()).collect();
        expected.reverse();
        assert_eq!(desc_titles, expected);
    }

    #[tokio::test]
    async fn es_integration_category_filter() {
        let client = create_client().await;
        index_submissions(
            &client,
            &[
                submission(1, "Roof", "", &[1]),
                submission(2, "Roof and gutters", "", &[1, 2]),
                submission(3, "Sink", "", &[3]),
            ],
        )
        .await;

        let criteria = SubmissionCriteria {
            category_ids: vec![1],
            sorting: Some(Sorting::new(SubmissionSortField::Title, SortOrder::Desc)),
            ..Default::default()
        };
        let page = client.search(&criteria).await.unwrap();

        assert_eq!(page.total_count, 2);
        assert_eq!(ids_of(&page.items), vec![2, 1]);
    }

    #[tokio::test]
    async fn es_integration_filters_are_conjunctive() {
        let client = create_client().await;
        let mut submissions = vec![
            submission(1, "Roof", "", &[1]),
            submission(2, "Sink", "", &[3]),
            submission(3, "Roof", "", &[1]),
            submission(4, "Attic", "", &[2]),
        ];
        for s in &mut submissions[2..] {
            s.owner = customer(8, "Alan", "Turing");
        }
        index_submissions(&client, &submissions).await;

        let both = SubmissionCriteria {
            category_ids: vec![1],
            owner_id: Some(7),
            ..Default::default()
        };
        let page = client.search(&both).await.unwrap();
        assert_eq!(ids_of(&page.items), vec![1]);

        let none = client.search(&SubmissionCriteria::default()).await.unwrap();
        assert_eq!(none.total_count, 4);
    }

    #[tokio::test]
    async fn es_integration_range_filter() {
        let client = create_client().await;
        let submissions: Vec<Submission> = (1..=5)
            .map(|id| submission(id, "Job", "", &[]))
            .collect();
        index_submissions(&client, &submissions).await;

        // budget = 100 * id
        let page = client
            .search(&SubmissionCriteria {
                min_budget: Some(200.0),
                max_budget: Some(400.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ids_of(&page.items), vec![2, 3, 4]);
    }

    #[tokio::test]
    async fn es_integration_text_query_contains_match() {
        let client = create_client().await;
        index_submissions(
            &client,
            &[
                submission(1, "Leaking ceiling", "Roofing repair needed", &[1]),
                submission(2, "New sink", "Kitchen plumbing", &[3]),
            ],
        )
        .await;

        let page = client
            .search(&SubmissionCriteria {
                query: Some("roof".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ids_of(&page.items), vec![1]);

        let by_owner = client
            .search(&SubmissionCriteria {
                query: Some("hopper".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_owner.total_count, 2);
    }

    #[test]
    fn es_integration_unknown_sort_field_is_rejected() {
        let err = Sorting::<SubmissionSortField>::parse("relevance", Some("desc")).unwrap_err();
        assert!(matches!(err, SortError::UnknownField { .. }));
    }

    // ========================================================================
    // Rebuild
    // ========================================================================

    fn orchestrator(
        client: &ElasticsearchClient,
        repo: &Arc<InMemoryRepository<Submission>>,
    ) -> RebuildOrchestrator<Submission, ElasticsearchClient, InMemoryRepository<Submission>> {
        RebuildOrchestrator::new(
            EntityKind::Submission,
            Arc::new(client.clone()),
            repo.clone(),
            RebuildTracker::new(),
        )
    }

    #[tokio::test]
    async fn es_integration_rebuild_empty_table() {
        let client = create_client().await;
        let repo = Arc::new(InMemoryRepository::new());

        let outcome = orchestrator(&client, &repo).rebuild().await;

        assert_eq!(outcome.status, RebuildStatus::Completed);
        let index = client.index_for::<SubmissionDocument>();
        assert!(client.index_exists(&index).await.unwrap());
        let page = client.search(&SubmissionCriteria::default()).await.unwrap();
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn es_integration_rebuild_replaces_stale_content() {
        let client = create_client().await;
        let stale: Vec<Submission> = (100..110)
            .map(|id| submission(id, "Stale", "", &[]))
            .collect();
        index_submissions(&client, &stale).await;

        let repo = Arc::new(InMemoryRepository::new());
        for id in 1..=3 {
            repo.insert(id, submission(id, "Fresh", "", &[1]));
        }

        let outcome = orchestrator(&client, &repo).rebuild().await;

        assert_eq!(outcome.status, RebuildStatus::Completed);
        assert_eq!(outcome.deleted, 10);
        assert_eq!(outcome.indexed, 3);

        let page = client.search(&SubmissionCriteria::default()).await.unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(ids_of(&page.items), vec![1, 2, 3]);
    }
}
