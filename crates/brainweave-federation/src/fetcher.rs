//! Concurrent, timeboxed fetching of peers' brain maps.
//!
//! The fetch operation as a whole never fails: every configured source is
//! requested concurrently, each with its own timeout, and whatever parses
//! cleanly is merged into the result. A source that times out, errors, or
//! returns malformed JSON is dropped with a warning.

use crate::map::ExternalBrainMap;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default per-request timebox.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(6);

#[derive(Error, Debug)]
enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// HTTP client for federation map endpoints.
#[derive(Debug, Clone)]
pub struct FederationClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl FederationClient {
    /// Create a client with the default 6 second per-request timebox.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom per-request timebox.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Fetch every configured source concurrently.
    ///
    /// Resolves once each request has succeeded, failed, or timed out; the
    /// result contains an entry only for sources that returned parseable
    /// JSON with a success status. An empty input resolves immediately.
    pub async fn fetch_all(
        &self,
        sources: &BTreeMap<String, String>,
    ) -> BTreeMap<String, ExternalBrainMap> {
        if sources.is_empty() {
            return BTreeMap::new();
        }

        let requests = sources.iter().map(|(name, url)| async move {
            match tokio::time::timeout(self.timeout, self.fetch_one(url)).await {
                Ok(Ok(map)) => {
                    debug!(source = %name, pages = map.pages.len(), "fetched federation map");
                    Some((name.clone(), map))
                }
                Ok(Err(err)) => {
                    warn!(source = %name, url = %url, error = %err, "dropping federation source");
                    None
                }
                Err(_) => {
                    warn!(
                        source = %name,
                        url = %url,
                        error = %FetchError::Timeout(self.timeout),
                        "dropping federation source"
                    );
                    None
                }
            }
        });

        futures::future::join_all(requests)
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    async fn fetch_one(&self, url: &str) -> Result<ExternalBrainMap, FetchError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

impl Default for FederationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn map_body(root: &str) -> serde_json::Value {
        serde_json::json!({
            "rootDomain": root,
            "pages": {"books": ["books"]},
            "externalReferences": []
        })
    }

    fn sources(entries: &[(&str, String)]) -> BTreeMap<String, String> {
        entries.iter().map(|(n, u)| (n.to_string(), u.clone())).collect()
    }

    #[tokio::test]
    async fn empty_input_resolves_immediately() {
        let client = FederationClient::new();
        let result = client.fetch_all(&BTreeMap::new()).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn fetches_parseable_sources() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/brainmap.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(map_body("https://a.example")))
            .mount(&server)
            .await;

        let client = FederationClient::new();
        let result = client
            .fetch_all(&sources(&[("peer", format!("{}/brainmap.json", server.uri()))]))
            .await;

        assert_eq!(result.len(), 1);
        assert_eq!(result["peer"].root_domain, "https://a.example");
    }

    #[tokio::test]
    async fn slow_source_is_dropped_and_the_rest_survive() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fast.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(map_body("https://fast.example")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/slow.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(map_body("https://slow.example"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = FederationClient::with_timeout(Duration::from_millis(100));
        let result = client
            .fetch_all(&sources(&[
                ("fast", format!("{}/fast.json", server.uri())),
                ("slow", format!("{}/slow.json", server.uri())),
            ]))
            .await;

        assert_eq!(result.len(), 1);
        assert!(result.contains_key("fast"));
    }

    #[tokio::test]
    async fn malformed_json_and_error_statuses_are_dropped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bad.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/good.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(map_body("https://good.example")))
            .mount(&server)
            .await;

        let client = FederationClient::new();
        let result = client
            .fetch_all(&sources(&[
                ("bad", format!("{}/bad.json", server.uri())),
                ("missing", format!("{}/missing.json", server.uri())),
                ("good", format!("{}/good.json", server.uri())),
            ]))
            .await;

        assert_eq!(result.len(), 1);
        assert!(result.contains_key("good"));
    }

    #[tokio::test]
    async fn unreachable_source_never_raises() {
        let client = FederationClient::with_timeout(Duration::from_millis(200));
        let result = client
            .fetch_all(&sources(&[("down", "http://127.0.0.1:1/brainmap.json".to_string())]))
            .await;
        assert!(result.is_empty());
    }
}
