use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;
use serde_json::Value;

use crate::config::HttpConfig;
use crate::error::FetchError;

/// Issues batches of independent GET+JSON requests. One batch per source per
/// run; within a batch every request runs concurrently.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &HttpConfig) -> anyhow::Result<Self> {
        if config.danger_accept_invalid_certs {
            tracing::warn!("TLS certificate verification is DISABLED by config");
        }
        let client = Client::builder()
            .danger_accept_invalid_certs(config.danger_accept_invalid_certs)
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// GET one URL and decode the body as JSON. Anything but a 200 with a
    /// valid JSON body is an error.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = resp.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Fetches every URL in the batch concurrently and waits for all of them
    /// to finish. Results come back in request order, not completion order.
    ///
    /// The batch is atomic: if any request fails, the first failure in
    /// request order is returned and the rest of the batch is discarded.
    /// There is no cancellation (every request runs to completion before the
    /// join returns) and no retries.
    pub async fn fetch_all(&self, urls: &[String]) -> Result<Vec<Value>, FetchError> {
        tracing::debug!(batch_size = urls.len(), "Dispatching fetch batch");
        let futures: Vec<_> = urls.iter().map(|url| self.fetch_json(url)).collect();
        join_all(futures).await.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    #[tokio::test]
    async fn test_failed_batch_returns_error_not_partial_results() {
        let fetcher = Fetcher::new(&HttpConfig::default()).unwrap();
        // Port 9 (discard) on loopback: connection refused, no network needed.
        let urls = vec![
            "http://127.0.0.1:9/one".to_string(),
            "http://127.0.0.1:9/two".to_string(),
            "http://127.0.0.1:9/three".to_string(),
        ];

        match fetcher.fetch_all(&urls).await {
            Err(FetchError::Transport { url, .. }) => {
                assert_eq!(url, "http://127.0.0.1:9/one", "first error in request order");
            }
            Err(other) => panic!("expected transport error, got {other}"),
            Ok(values) => panic!("batch must not succeed partially, got {} values", values.len()),
        }
    }
}
