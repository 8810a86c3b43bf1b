//! The four-stage research → draft → enhance run.

use pipeline::{
    ActivityObserver, Credentials, FailureKind, GenerationError, ReportGenerator, ReportText,
    ResearchClient, ResearchError, ResearchFindings, ResearchParams, RunFailure, RunId, Stage,
    Topic,
};
use tracing::{info, info_span, warn, Instrument};

use crate::prompts::{draft_prompt, enhancement_prompt};

/// Message returned when a run is started without both API keys.
pub const MISSING_CREDENTIALS_MESSAGE: &str =
    "Please provide both the research and generation API keys.";

/// Everything one run needs from the user.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// What to research.
    pub topic: Topic,
    /// Keys for this run only.
    pub credentials: Credentials,
}

impl RunRequest {
    /// Creates a run request.
    pub fn new(topic: Topic, credentials: Credentials) -> Self {
        Self { topic, credentials }
    }
}

/// Output of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchReport {
    /// Identifier recorded on every span of the run.
    pub run_id: RunId,
    /// The researched topic.
    pub topic: Topic,
    /// Number of sources the research call returned.
    pub sources_count: usize,
    /// First-pass report.
    pub draft: ReportText,
    /// Final artifact.
    pub enhanced: ReportText,
}

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success(ResearchReport),
    Failure(RunFailure),
}

impl RunOutcome {
    /// Converts the outcome into a `Result`.
    pub fn into_result(self) -> Result<ResearchReport, RunFailure> {
        match self {
            RunOutcome::Success(report) => Ok(report),
            RunOutcome::Failure(failure) => Err(failure),
        }
    }

    /// Returns `true` for [`RunOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success(_))
    }
}

/// Drives a single run through research, draft generation, and enhancement.
///
/// Stages execute strictly in sequence. The first failing stage ends the run;
/// later stages are never attempted and no partial report is returned.
pub struct PipelineExecutor<R, G> {
    research: R,
    generator: G,
    params: ResearchParams,
}

impl<R, G> PipelineExecutor<R, G>
where
    R: ResearchClient,
    G: ReportGenerator,
{
    /// Creates an executor using the default research limits.
    pub fn new(research: R, generator: G) -> Self {
        Self::with_params(research, generator, ResearchParams::default())
    }

    /// Creates an executor with explicit research limits.
    pub fn with_params(research: R, generator: G, params: ResearchParams) -> Self {
        Self {
            research,
            generator,
            params,
        }
    }

    /// Executes one run. Never panics and never returns an error: every
    /// failure is folded into [`RunOutcome::Failure`].
    pub async fn run(&self, request: &RunRequest, observer: &dyn ActivityObserver) -> RunOutcome {
        let run_id = RunId::new_random();
        let span = info_span!(
            "pipeline_run",
            run_id = %run_id,
            topic = %request.topic,
            model = %self.generator.model(),
        );

        match self.run_stages(run_id, request, observer).instrument(span.clone()).await {
            Ok(report) => {
                span.in_scope(|| info!(sources = report.sources_count, "Run completed"));
                RunOutcome::Success(report)
            }
            Err(failure) => {
                span.in_scope(|| {
                    warn!(
                        stage = %failure.stage,
                        kind = ?failure.kind,
                        "Run failed: {}",
                        failure.message
                    )
                });
                RunOutcome::Failure(failure)
            }
        }
    }

    async fn run_stages(
        &self,
        run_id: RunId,
        request: &RunRequest,
        observer: &dyn ActivityObserver,
    ) -> Result<ResearchReport, RunFailure> {
        let RunRequest { topic, credentials } = request;

        if !credentials.is_complete() {
            return Err(RunFailure {
                stage: Stage::Preflight,
                kind: FailureKind::MissingCredential,
                message: MISSING_CREDENTIALS_MESSAGE.to_string(),
            });
        }

        info!(
            max_depth = self.params.max_depth(),
            time_limit_secs = self.params.time_limit().as_secs(),
            max_urls = self.params.max_urls(),
            "Starting research"
        );
        let findings = self
            .research
            .research(credentials, topic, &self.params, observer)
            .await
            .map_err(research_failure)?;
        info!(sources = findings.sources_count(), "Research completed");

        let draft = self.draft(topic, credentials, &findings).await?;
        info!(chars = draft.as_str().len(), "Draft report generated");

        let prompt = enhancement_prompt(topic, draft.as_str());
        let enhanced = self
            .generator
            .generate(credentials, &prompt)
            .await
            .map_err(|err| generation_failure(Stage::Enhance, &err))?;
        info!(chars = enhanced.as_str().len(), "Enhanced report generated");

        Ok(ResearchReport {
            run_id,
            topic: topic.clone(),
            sources_count: findings.sources_count(),
            draft,
            enhanced,
        })
    }

    async fn draft(
        &self,
        topic: &Topic,
        credentials: &Credentials,
        findings: &ResearchFindings,
    ) -> Result<ReportText, RunFailure> {
        let prompt = draft_prompt(topic, findings);
        self.generator
            .generate(credentials, &prompt)
            .await
            .map_err(|err| generation_failure(Stage::Draft, &err))
    }
}

fn research_failure(err: ResearchError) -> RunFailure {
    RunFailure {
        stage: Stage::Research,
        kind: FailureKind::from(&err),
        message: format!("Research failed: {err}"),
    }
}

fn generation_failure(stage: Stage, err: &GenerationError) -> RunFailure {
    let message = match (err, stage) {
        (GenerationError::ModelInit { .. }, _) => format!(
            "Failed to initialize generation model: {err}. Please check your API key."
        ),
        (_, Stage::Enhance) => format!("Failed to enhance report: {err}"),
        _ => format!("Failed to generate report: {err}"),
    };
    RunFailure {
        stage,
        kind: FailureKind::from(err),
        message,
    }
}
