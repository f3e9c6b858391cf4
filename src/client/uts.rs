use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::client::{RelationsResponse, SearchResponse, TerminologyApi};
use crate::config::UtsConfig;
use crate::error::{Result, UmlsGraphError};

/// UTS REST client
///
/// Authenticates every call with the `apiKey` query parameter. Transient
/// failures (429 and 5xx) are retried with exponential backoff; anything else
/// surfaces as [`UmlsGraphError::FetchFailed`] immediately.
pub struct UtsClient {
    client: Client,
    base_url: Url,
    api_key: String,
    max_retries: usize,
    retry_delay: Duration,
}

impl UtsClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `base_url` - REST root, e.g. `https://uts-ws.nlm.nih.gov/rest`
    /// * `api_key` - UTS API key
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| UmlsGraphError::InvalidInput(format!("Invalid base URL {}: {}", base_url, e)))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
            max_retries: 0,
            retry_delay: Duration::from_millis(500),
        })
    }

    /// Create a client from the `[uts]` config section and an already-resolved key
    pub fn from_config(config: &UtsConfig, api_key: String) -> Result<Self> {
        Ok(Self::new(
            &config.base_url,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )?
        .with_retries(config.max_retries))
    }

    /// Retry transient failures up to `max_retries` extra times
    pub fn with_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Initial backoff delay (doubled after each retry)
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// URL of the search endpoint for `term`; whitespace becomes `+` through form encoding.
    fn search_url(&self, term: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}/search/current", self.base_url.path().trim_end_matches('/')));
        url.query_pairs_mut()
            .append_pair("string", term)
            .append_pair("apiKey", &self.api_key);
        url
    }

    /// URL of one relations page for a concept URI returned by the service.
    fn relations_url(&self, uri: &str, page: u32) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/relations", uri.trim_end_matches('/')))
            .map_err(|e| UmlsGraphError::FetchFailed(format!("Invalid concept URI {}: {}", uri, e)))?;
        url.query_pairs_mut()
            .append_pair("pageNumber", &page.to_string())
            .append_pair("apiKey", &self.api_key);
        Ok(url)
    }

    /// GET `url` and decode its JSON body, retrying transient failures.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let mut attempt = 0;
        let mut delay = self.retry_delay;

        loop {
            let start = std::time::Instant::now();
            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| {
                    UmlsGraphError::FetchFailed(format!("Network error for {}: {}", redact(&url), e.without_url()))
                })?;

            let status = response.status();
            log::debug!("GET {} -> {} in {:?}", redact(&url), status, start.elapsed());

            if status.is_success() {
                return response
                    .json::<T>()
                    .await
                    .map_err(|e| {
                        UmlsGraphError::FetchFailed(format!(
                            "Failed to parse response from {}: {}",
                            redact(&url),
                            e.without_url()
                        ))
                    });
            }

            if is_retryable(status) && attempt < self.max_retries {
                log::warn!(
                    "Retry {}/{} after {} from {}",
                    attempt + 1,
                    self.max_retries,
                    status,
                    redact(&url)
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
                continue;
            }

            return Err(UmlsGraphError::FetchFailed(format!(
                "Failed to fetch {}. Response code: {}",
                redact(&url),
                status.as_u16()
            )));
        }
    }
}

#[async_trait]
impl TerminologyApi for UtsClient {
    async fn search(&self, term: &str) -> Result<SearchResponse> {
        self.get_json(self.search_url(term)).await
    }

    async fn relations(&self, uri: &str, page: u32) -> Result<RelationsResponse> {
        let url = self.relations_url(uri, page)?;
        self.get_json(url).await
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// URL for logs with the API key masked.
fn redact(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apiKey" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}
