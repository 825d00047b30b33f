//! Elasticsearch client construction and cluster-level calls.

use std::fmt::Debug;

use elasticsearch::Elasticsearch;
use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::cluster::ClusterHealthParts;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::indices::IndicesRefreshParts;
use serde_json::Value;

use crate::config::{SearchAuth, SearchConfig};
use crate::error::{BackendError, IndexResult};
use crate::index_name::IndexNameResolver;

/// Gateway to one Elasticsearch cluster.
///
/// Holds no document state. Cloning is cheap and clones share the underlying
/// HTTP transport.
#[derive(Clone)]
pub struct ElasticsearchClient {
    client: Elasticsearch,
    config: SearchConfig,
    resolver: IndexNameResolver,
}

impl Debug for ElasticsearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchClient")
            .field("nodes", &self.config.nodes)
            .field("index_prefix", &self.config.index_prefix)
            .finish_non_exhaustive()
    }
}

impl ElasticsearchClient {
    /// Creates a client for the first configured node.
    pub fn new(config: SearchConfig) -> IndexResult<Self> {
        let client = Self::build_client(&config)?;
        let resolver = IndexNameResolver::new(config.index_prefix.clone());

        tracing::debug!(
            nodes = ?config.nodes,
            index_prefix = %config.index_prefix,
            "Created Elasticsearch client"
        );

        Ok(Self {
            client,
            config,
            resolver,
        })
    }

    fn build_client(config: &SearchConfig) -> Result<Elasticsearch, BackendError> {
        let url = config
            .nodes
            .iter()
            .find(|n| !n.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| "http://localhost:9200".to_string());

        let parsed_url: elasticsearch::http::Url =
            url.parse().map_err(|e| BackendError::ConnectionFailed {
                message: format!("Invalid URL '{}': {}", url, e),
            })?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);

        let mut builder = TransportBuilder::new(conn_pool).timeout(config.request_timeout());

        if config.disable_certificate_validation {
            builder = builder.cert_validation(CertificateValidation::None);
        }

        if let Some(ref auth) = config.auth {
            builder = match auth {
                SearchAuth::Basic { username, password } => {
                    builder.auth(Credentials::Basic(username.clone(), password.clone()))
                }
                SearchAuth::Bearer { token } => builder.auth(Credentials::Bearer(token.clone())),
            };
        }

        let transport = builder
            .build()
            .map_err(|e| BackendError::ConnectionFailed {
                message: format!("Failed to build transport: {}", e),
            })?;

        Ok(Elasticsearch::new(transport))
    }

    pub(crate) fn client(&self) -> &Elasticsearch {
        &self.client
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Returns the resolver used to name indexes.
    pub fn resolver(&self) -> &IndexNameResolver {
        &self.resolver
    }

    /// Returns the index holding documents of type `T`.
    pub fn index_for<T: 'static>(&self) -> String {
        self.resolver.index_for::<T>()
    }

    /// Checks that the cluster answers and is not red.
    pub async fn health_check(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| BackendError::Unavailable {
                message: format!("Health check failed: {}", e),
            })?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(BackendError::Unavailable {
                message: format!("Cluster health returned status {}", status),
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| BackendError::Unavailable {
                message: format!("Failed to parse health response: {}", e),
            })?;

        let cluster_status = body
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown");

        if cluster_status == "red" {
            return Err(BackendError::Unavailable {
                message: "Cluster status is red".to_string(),
            });
        }

        tracing::trace!(cluster_status, "Elasticsearch health check passed");
        Ok(())
    }

    /// Refreshes an index so recent writes become searchable.
    pub async fn refresh_index(&self, index: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| {
                BackendError::request_failed(index, "Failed to refresh index", e)
            })?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::internal(
                index,
                format!("Failed to refresh index (status {}): {}", status, body),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{SubmissionDocument, UserDocument};

    #[test]
    fn test_client_resolves_prefixed_indexes() {
        let config = SearchConfig {
            index_prefix: "market".to_string(),
            ..Default::default()
        };
        let client = ElasticsearchClient::new(config).unwrap();
        assert_eq!(client.index_for::<UserDocument>(), "market_users");
        assert_eq!(
            client.index_for::<SubmissionDocument>(),
            "market_submissions"
        );
    }

    #[test]
    fn test_invalid_url_is_a_connection_error() {
        let config = SearchConfig {
            nodes: vec!["not a url".to_string()],
            ..Default::default()
        };
        let err = ElasticsearchClient::new(config).unwrap_err();
        assert!(err.to_string().contains("connection to search engine failed"));
    }

    #[test]
    fn test_client_builds_with_auth() {
        let config = SearchConfig {
            auth: Some(SearchAuth::Basic {
                username: "elastic".to_string(),
                password: "changeme".to_string(),
            }),
            disable_certificate_validation: true,
            ..Default::default()
        };
        assert!(ElasticsearchClient::new(config).is_ok());
    }
}
