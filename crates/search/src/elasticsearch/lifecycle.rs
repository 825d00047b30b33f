//! Health-gated index creation.

use super::client::ElasticsearchClient;

impl ElasticsearchClient {
    /// Waits for the cluster to become available.
    ///
    /// Tries `availability_check_attempts` times with a fixed
    /// `availability_check_delay_ms` sleep in between. The wait cannot be
    /// cancelled once started.
    pub async fn wait_until_available(&self) -> bool {
        let attempts = self.config().availability_check_attempts.max(1);
        let delay = self.config().availability_check_delay();

        for attempt in 1..=attempts {
            match self.health_check().await {
                Ok(()) => {
                    if attempt > 1 {
                        tracing::info!(attempt, "Elasticsearch became available");
                    }
                    return true;
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = attempts,
                        error = %e,
                        "Elasticsearch not available"
                    );
                    if attempt < attempts {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        false
    }

    /// Creates `index` if it is missing.
    ///
    /// Returns `false` when the cluster stays unavailable or any engine call
    /// fails. Never returns an error.
    pub async fn ensure_index(&self, index: &str) -> bool {
        if !self.wait_until_available().await {
            tracing::error!(
                index,
                attempts = self.config().availability_check_attempts,
                "Giving up on index creation, Elasticsearch unavailable"
            );
            return false;
        }

        match self.index_exists(index).await {
            Ok(true) => {
                tracing::debug!(index, "Index already exists");
                true
            }
            Ok(false) => match self.create_index(index).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!(index, error = %e, "Failed to create index");
                    false
                }
            },
            Err(e) => {
                tracing::error!(index, error = %e, "Failed to check index existence");
                false
            }
        }
    }
}
