//! Firecrawl deep-research wire types and payload interpretation.
//!
//! Everything here is pure so payload handling can be tested with JSON
//! fixtures, without a live endpoint.

use pipeline::{
    ActivityEvent, ActivityObserver, ResearchError, ResearchFindings, ResearchParams, Source,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /v1/deep-research`.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StartRequest<'a> {
    pub query: &'a str,
    pub max_depth: u32,
    /// Seconds.
    pub time_limit: u64,
    pub max_urls: u32,
}

impl<'a> StartRequest<'a> {
    pub(crate) fn new(query: &'a str, params: &ResearchParams) -> Self {
        Self {
            query,
            max_depth: params.max_depth(),
            time_limit: params.time_limit().as_secs(),
            max_urls: params.max_urls(),
        }
    }
}

/// Response to `POST /v1/deep-research`.
#[derive(Debug, Deserialize)]
pub(crate) struct StartResponse {
    #[serde(default)]
    pub success: bool,
    pub id: Option<String>,
    pub error: Option<String>,
}

impl StartResponse {
    /// Extracts the job id, treating `success: false` as an API error.
    pub(crate) fn into_job_id(self) -> Result<String, ResearchError> {
        if !self.success {
            return Err(ResearchError::network(
                self.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }
        self.id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ResearchError::invalid("start response has no job id"))
    }
}

/// Response to `GET /v1/deep-research/{id}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StatusResponse {
    pub success: Option<bool>,
    pub status: Option<String>,
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient_activities")]
    pub activities: Vec<Activity>,
    pub data: Option<StatusData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusData {
    pub final_analysis: Option<String>,
    pub sources: Option<Vec<SourceEntry>>,
}

/// One entry of `data.sources`. Firecrawl has shipped the summary under both
/// `summary` and `description`; unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SourceEntry {
    pub url: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl From<SourceEntry> for Source {
    fn from(entry: SourceEntry) -> Self {
        Source {
            url: entry.url,
            summary: entry.summary.or(entry.description),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Activity {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: Option<String>,
}

/// Activities are advisory: entries that are not activity objects are
/// dropped instead of failing the whole status payload.
fn lenient_activities<'de, D>(deserializer: D) -> Result<Vec<Activity>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let entries = match raw {
        serde_json::Value::Array(entries) => entries,
        _ => return Ok(Vec::new()),
    };
    Ok(entries
        .into_iter()
        .map(|entry| serde_json::from_value(entry).unwrap_or_default())
        .collect())
}

/// What one poll tells us about the job.
#[derive(Debug)]
pub(crate) enum JobState {
    Running,
    Finished(Result<ResearchFindings, ResearchError>),
}

/// Classifies a status payload.
pub(crate) fn interpret(response: StatusResponse) -> JobState {
    if response.success == Some(false) {
        return JobState::Finished(Err(ResearchError::network(
            response
                .error
                .unwrap_or_else(|| "Unknown error".to_string()),
        )));
    }

    match response.status.as_deref() {
        Some("completed") => JobState::Finished(findings_from(response.data)),
        Some("failed") => JobState::Finished(Err(ResearchError::network(
            response
                .error
                .unwrap_or_else(|| "Deep research job failed".to_string()),
        ))),
        _ => JobState::Running,
    }
}

/// Validates a completed payload: both the analysis and the source list are
/// required.
pub(crate) fn findings_from(data: Option<StatusData>) -> Result<ResearchFindings, ResearchError> {
    let data = data.ok_or_else(|| ResearchError::invalid("completed payload has no data"))?;
    let final_analysis = data
        .final_analysis
        .ok_or_else(|| ResearchError::invalid("completed payload has no data.finalAnalysis"))?;
    let sources = data
        .sources
        .ok_or_else(|| ResearchError::invalid("completed payload has no data.sources"))?;
    Ok(ResearchFindings::new(
        final_analysis,
        sources.into_iter().map(Source::from).collect(),
    ))
}

/// Forwards each activity to the observer once, in API order.
///
/// The API returns the cumulative activity list on every poll.
#[derive(Debug, Default)]
pub(crate) struct ActivityCursor {
    delivered: usize,
}

impl ActivityCursor {
    pub(crate) fn forward(&mut self, activities: &[Activity], observer: &dyn ActivityObserver) {
        for activity in activities.iter().skip(self.delivered) {
            let kind = activity.kind.as_deref().unwrap_or("activity");
            let message = activity.message.as_deref().unwrap_or_default();
            tracing::debug!(kind = %kind, "{}", message);
            observer.on_activity(&ActivityEvent::new(kind, message));
        }
        self.delivered = self.delivered.max(activities.len());
    }
}

/// Pulls the API's `error` field out of an error body, if there is one.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(str::to_string)
}
