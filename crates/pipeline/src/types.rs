//! Shared value types for the research pipeline domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (research limits are strictly positive,
//! the source count always matches the source list) and flow between stages.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

// ---------------------------------------------------------------------------
// Research request limits
// ---------------------------------------------------------------------------

/// Limits applied to one deep-research call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchParams {
    max_depth: u32,
    time_limit: Duration,
    max_urls: u32,
}

impl ResearchParams {
    /// Default crawl depth.
    pub const DEFAULT_MAX_DEPTH: u32 = 3;
    /// Default time budget for the research job.
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(180);
    /// Default number of URLs the research job may visit.
    pub const DEFAULT_MAX_URLS: u32 = 10;

    /// Creates research limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if any limit is zero.
    pub fn new(max_depth: u32, time_limit: Duration, max_urls: u32) -> Result<Self, ConfigError> {
        if max_depth == 0 {
            return Err(ConfigError::invalid("max_depth", "must be at least 1"));
        }
        if time_limit.is_zero() {
            return Err(ConfigError::invalid("time_limit", "must be at least 1 second"));
        }
        if max_urls == 0 {
            return Err(ConfigError::invalid("max_urls", "must be at least 1"));
        }
        Ok(Self {
            max_depth,
            time_limit,
            max_urls,
        })
    }

    /// Maximum crawl depth.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Time budget granted to the research job.
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Maximum number of URLs to visit.
    pub fn max_urls(&self) -> u32 {
        self.max_urls
    }
}

impl Default for ResearchParams {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            time_limit: Self::DEFAULT_TIME_LIMIT,
            max_urls: Self::DEFAULT_MAX_URLS,
        }
    }
}

// ---------------------------------------------------------------------------
// Research output
// ---------------------------------------------------------------------------

/// A single reference returned by the research API.
///
/// Either field may be missing in the API payload. Sources without a URL are
/// still counted but never previewed in prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Address of the referenced page.
    #[serde(default)]
    pub url: Option<String>,

    /// Short description of the page content.
    #[serde(default)]
    pub summary: Option<String>,
}

impl Source {
    /// Creates a source with a URL and optional summary.
    pub fn new(url: impl Into<String>, summary: Option<String>) -> Self {
        Self {
            url: Some(url.into()),
            summary,
        }
    }
}

// ---------------------------------------------------------------------------

/// The successful outcome of a research call.
///
/// Immutable once built; `sources_count` always equals `sources.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchFindings {
    final_analysis: String,
    sources: Vec<Source>,
    sources_count: usize,
}

impl ResearchFindings {
    /// Creates findings from the analysis text and the ordered source list.
    pub fn new(final_analysis: impl Into<String>, sources: Vec<Source>) -> Self {
        let sources_count = sources.len();
        Self {
            final_analysis: final_analysis.into(),
            sources,
            sources_count,
        }
    }

    /// The research tool's own synthesis of what it found.
    pub fn final_analysis(&self) -> &str {
        &self.final_analysis
    }

    /// All sources in the order the API returned them.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Total number of sources, including those without a URL.
    pub fn sources_count(&self) -> usize {
        self.sources_count
    }
}

// ---------------------------------------------------------------------------
// Progress notifications
// ---------------------------------------------------------------------------

/// An advisory progress notification emitted while research is running.
///
/// Activity events are informational only; nothing in the pipeline branches
/// on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Activity category reported by the API (e.g. `"search"`, `"analyze"`).
    pub kind: String,

    /// Human-readable description of the activity.
    pub message: String,

    /// When the event was observed locally.
    pub observed_at: Timestamp,
}

impl ActivityEvent {
    /// Creates an event stamped with the current time.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            observed_at: Timestamp::now(),
        }
    }
}

impl std::fmt::Display for ActivityEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Markdown text produced by the generator (a draft or an enhanced report).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportText(String);

impl ReportText {
    /// Wraps generated markdown.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the markdown as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the report and returns the markdown.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ReportText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
