//! Firecrawl deep-research adapter.
//!
//! Implements the [`pipeline::ResearchClient`] trait over Firecrawl's
//! asynchronous deep-research API: a job is started with one `POST`, then its
//! status is polled until it completes or fails. Activities reported by the
//! API are forwarded to the caller's [`pipeline::ActivityObserver`] as they
//! appear.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, authentication, polling, and payload
//! validation all live here. The [`pipeline`] crate sees only
//! [`pipeline::ResearchClient`].

mod config;
mod wire;

use async_trait::async_trait;
use pipeline::{
    ActivityObserver, ApiKey, ConfigError, Credentials, ResearchClient, ResearchError,
    ResearchFindings, ResearchParams, Topic,
};
use reqwest::{Client, StatusCode, Url};
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

pub use config::{FirecrawlConfig, DEFAULT_BASE_URL};

use wire::{ActivityCursor, JobState, StartRequest, StartResponse, StatusResponse};

/// [`ResearchClient`] backed by the Firecrawl deep-research endpoint.
#[derive(Debug, Clone)]
pub struct FirecrawlClient {
    client: Client,
    base_url: Url,
    config: FirecrawlConfig,
}

impl FirecrawlClient {
    /// Creates a client from validated settings.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the settings are invalid or the HTTP client cannot
    /// be constructed.
    pub fn new(config: FirecrawlConfig) -> Result<Self, ConfigError> {
        let base_url = config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ConfigError::invalid("research_http_client", e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ResearchError> {
        self.base_url
            .join(path)
            .map_err(|e| ResearchError::network(format!("Invalid research endpoint: {e}")))
    }

    async fn start_job(
        &self,
        key: &ApiKey,
        query: &Topic,
        params: &ResearchParams,
    ) -> Result<String, ResearchError> {
        let url = self.endpoint("v1/deep-research")?;
        debug!(url = %url, "Starting deep research job");

        let response = self
            .client
            .post(url)
            .bearer_auth(key.expose())
            .json(&StartRequest::new(query.as_str(), params))
            .send()
            .await
            .map_err(|e| ResearchError::network(format!("Request to research API failed: {e}")))?;

        let body = read_body(response).await?;
        let start: StartResponse = serde_json::from_str(&body)
            .map_err(|e| ResearchError::invalid(format!("malformed start response: {e}")))?;
        start.into_job_id()
    }

    async fn poll_status(&self, key: &ApiKey, job_id: &str) -> Result<StatusResponse, ResearchError> {
        let url = self.endpoint(&format!("v1/deep-research/{job_id}"))?;
        let response = self
            .client
            .get(url)
            .bearer_auth(key.expose())
            .send()
            .await
            .map_err(|e| ResearchError::network(format!("Request to research API failed: {e}")))?;

        let body = read_body(response).await?;
        serde_json::from_str(&body)
            .map_err(|e| ResearchError::invalid(format!("malformed status response: {e}")))
    }
}

/// Reads a response body, mapping non-2xx statuses to an API error.
async fn read_body(response: reqwest::Response) -> Result<String, ResearchError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ResearchError::network(format!("Failed to read research response: {e}")))?;
    if !status.is_success() {
        return Err(map_http_error(status, &body));
    }
    Ok(body)
}

fn map_http_error(status: StatusCode, body: &str) -> ResearchError {
    let detail = wire::error_detail(body).unwrap_or_else(|| body.trim().to_string());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ResearchError::network(format!(
            "HTTP {status} from research API (check the API key): {detail}"
        )),
        _ => ResearchError::network(format!("HTTP {status} from research API: {detail}")),
    }
}

#[async_trait]
impl ResearchClient for FirecrawlClient {
    async fn research(
        &self,
        credentials: &Credentials,
        query: &Topic,
        params: &ResearchParams,
        observer: &dyn ActivityObserver,
    ) -> Result<ResearchFindings, ResearchError> {
        let key = credentials
            .research()
            .ok_or(ResearchError::MissingCredential)?;

        let job_id = self.start_job(key, query, params).await?;
        info!(job_id = %job_id, "Deep research job started");

        let deadline = Instant::now() + params.time_limit() + self.config.completion_grace;
        let mut cursor = ActivityCursor::default();

        loop {
            let status = self.poll_status(key, &job_id).await?;
            cursor.forward(&status.activities, observer);

            if let JobState::Finished(result) = wire::interpret(status) {
                return result;
            }

            if Instant::now() >= deadline {
                return Err(ResearchError::network(format!(
                    "Research job {job_id} did not finish within {}s",
                    (params.time_limit() + self.config.completion_grace).as_secs()
                )));
            }

            sleep(self.config.poll_interval).await;
        }
    }
}
