use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Semaphore;
use url::Url;

use crate::error::{JobscopeError, Result};
use crate::model::{
    BugSuggestion, Classification, Job, JobDetail, JobLogUrl, PerfSeries, PerformanceDatum, Push,
    TextLogStep,
};
use crate::providers::DetailFetcher;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_SECONDS: u64 = 2;
const MAX_CONCURRENT_REQUESTS: usize = 8;

/// REST client for a Treeherder-compatible results service.
///
/// Transient failures (connection errors, timeouts, 429 and 5xx statuses)
/// are retried with a fixed delay; anything else surfaces immediately.
pub struct TreeherderClient {
    client: Client,
    api_url: Url,
    semaphore: Arc<Semaphore>,
}

impl TreeherderClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed or the HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("jobscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| JobscopeError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = Url::parse(base_url)
            .map_err(|e| JobscopeError::Config(format!("Invalid base URL: {e}")))?
            .join("api/")
            .map_err(|e| JobscopeError::Config(format!("Invalid API base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            semaphore: Arc::new(Semaphore::new(MAX_CONCURRENT_REQUESTS)),
        })
    }

    /// Origin the service is served from (e.g. <https://treeherder.mozilla.org>).
    pub fn origin(&self) -> String {
        self.api_url.origin().ascii_serialization()
    }

    /// Fetches a push by id. Used to prime the push index before selecting
    /// one of its jobs.
    pub async fn push(&self, project: &str, push_id: u64) -> Result<Push> {
        let url = self.endpoint(&format!("project/{project}/push/{push_id}/"))?;
        self.get_json(url).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path)
            .map_err(|e| JobscopeError::Config(format!("Invalid endpoint URL {path}: {e}")))
    }

    /// Execute a GET with automatic retry on network errors and rate limits,
    /// then deserialize the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        // One permit per logical request; retries reuse it
        let _permit = self.semaphore.acquire().await.unwrap();

        let mut retry_count = 0;
        loop {
            debug!("GET {url}");

            let response = match self.client.get(url.clone()).send().await {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() || e.is_request() => {
                    if retry_count >= MAX_RETRIES {
                        return Err(e.into());
                    }
                    warn!(
                        "Network error ({}), retrying in {}s ({}/{})...",
                        e,
                        RETRY_DELAY_SECONDS,
                        retry_count + 1,
                        MAX_RETRIES
                    );
                    tokio::time::sleep(Duration::from_secs(RETRY_DELAY_SECONDS)).await;
                    retry_count += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                if retry_count >= MAX_RETRIES {
                    return Err(JobscopeError::ApiAfterRetries {
                        status: status.as_u16(),
                        retries: MAX_RETRIES,
                    });
                }

                warn!(
                    "API error (status {status}). Waiting {RETRY_DELAY_SECONDS} seconds before retry {}/{}...",
                    retry_count + 1,
                    MAX_RETRIES
                );

                tokio::time::sleep(Duration::from_secs(RETRY_DELAY_SECONDS)).await;
                retry_count += 1;
                continue;
            }

            if !status.is_success() {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read error response".to_string());
                return Err(JobscopeError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            return Ok(serde_json::from_str(&body)?);
        }
    }
}

/// Paginated list envelope used by a few endpoints.
#[derive(Deserialize)]
struct ResultsPage<T> {
    results: Vec<T>,
}

#[async_trait]
impl DetailFetcher for TreeherderClient {
    async fn job(&self, project: &str, job_id: u64) -> Result<Job> {
        let url = self.endpoint(&format!("project/{project}/jobs/{job_id}/"))?;
        self.get_json(url).await
    }

    async fn job_details(&self, job_guid: &str) -> Result<Vec<JobDetail>> {
        // The job detail endpoint is service-global, keyed by GUID
        let mut url = self.endpoint("jobdetail/")?;
        url.query_pairs_mut().append_pair("job_guid", job_guid);

        let page: ResultsPage<JobDetail> = self.get_json(url).await?;
        Ok(page.results)
    }

    async fn job_log_urls(&self, project: &str, job_id: u64) -> Result<Vec<JobLogUrl>> {
        let mut url = self.endpoint(&format!("project/{project}/job-log-url/"))?;
        url.query_pairs_mut()
            .append_pair("job_id", &job_id.to_string());
        self.get_json(url).await
    }

    async fn performance_series_data(
        &self,
        project: &str,
        job_id: u64,
    ) -> Result<IndexMap<String, Vec<PerformanceDatum>>> {
        let mut url = self.endpoint(&format!("project/{project}/performance/data/"))?;
        url.query_pairs_mut()
            .append_pair("job_id", &job_id.to_string());
        self.get_json(url).await
    }

    async fn series_list(&self, project: &str, signature_ids: &[u64]) -> Result<Vec<PerfSeries>> {
        let mut url = self.endpoint(&format!("project/{project}/performance/signatures/"))?;
        {
            let mut query = url.query_pairs_mut();
            for id in signature_ids {
                query.append_pair("id", &id.to_string());
            }
        }
        self.get_json(url).await
    }

    async fn classifications(&self, project: &str, job_id: u64) -> Result<Vec<Classification>> {
        let mut url = self.endpoint(&format!("project/{project}/note/"))?;
        url.query_pairs_mut()
            .append_pair("job_id", &job_id.to_string());
        self.get_json(url).await
    }

    async fn bug_suggestions(&self, project: &str, job_id: u64) -> Result<Vec<BugSuggestion>> {
        let url = self.endpoint(&format!("project/{project}/jobs/{job_id}/bug_suggestions/"))?;
        self.get_json(url).await
    }

    async fn text_log_steps(&self, project: &str, job_id: u64) -> Result<Vec<TextLogStep>> {
        let url = self.endpoint(&format!("project/{project}/jobs/{job_id}/text_log_steps/"))?;
        self.get_json(url).await
    }
}
