//! Port traits implemented by infrastructure crates.
//!
//! The orchestrator depends only on these traits. `research` implements
//! [`ResearchClient`] over the Firecrawl deep-research API and `llm`
//! implements [`ReportGenerator`] over the Gemini API; tests substitute
//! in-memory doubles.

use async_trait::async_trait;

use crate::{
    ActivityEvent, Credentials, GenerationError, ModelId, ReportText, ResearchError,
    ResearchFindings, ResearchParams, Topic,
};

/// Receives advisory progress notifications during a research call.
///
/// Implementations must not block for long: they are invoked inline from the
/// research polling loop.
pub trait ActivityObserver: Send + Sync {
    /// Called once per activity, in the order the API reported them.
    fn on_activity(&self, event: &ActivityEvent);
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ActivityObserver for NoopObserver {
    fn on_activity(&self, _event: &ActivityEvent) {}
}

/// Performs a deep web-research job for a query.
#[async_trait]
pub trait ResearchClient: Send + Sync {
    /// Runs one research job to completion.
    ///
    /// # Errors
    ///
    /// - [`ResearchError::MissingCredential`] if `credentials` has no research
    ///   key. No request is sent.
    /// - [`ResearchError::InvalidResponse`] if the completed payload lacks the
    ///   final analysis or the source list.
    /// - [`ResearchError::NetworkOrApi`] for transport and API failures.
    async fn research(
        &self,
        credentials: &Credentials,
        query: &Topic,
        params: &ResearchParams,
        observer: &dyn ActivityObserver,
    ) -> Result<ResearchFindings, ResearchError>;
}

/// Turns a prompt into generated markdown using a fixed model.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    /// The model every call is sent to.
    fn model(&self) -> &ModelId;

    /// Sends a single generation request. Never retries.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::MissingCredential`] if `credentials` has no
    ///   generation key. No request is sent.
    /// - [`GenerationError::ModelInit`] if the model endpoint cannot be built.
    /// - [`GenerationError::Generation`] for any other failure.
    async fn generate(
        &self,
        credentials: &Credentials,
        prompt: &str,
    ) -> Result<ReportText, GenerationError>;
}
