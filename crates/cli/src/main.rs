//! Deep-research CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: turn command-line flags into validated
//!    [`pipeline::ResearchParams`], [`research::FirecrawlConfig`], and
//!    [`llm::GeminiConfig`].
//! 2. **Wire observability**: configure `tracing-subscriber` (text or JSON on
//!    stderr) and, when requested, an OpenTelemetry OTLP exporter.
//! 3. **Collect input**: take the topic and both API keys from flags or masked
//!    prompts. A run is only triggered once all three are non-blank.
//! 4. **Run and present**: drive one [`orchestrator::PipelineExecutor`] run,
//!    stream research activity to stderr, print the report to stdout, and
//!    write the `.md` file.

mod args;
mod input;
mod output;
mod telemetry;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use llm::GeminiGenerator;
use orchestrator::{activity_channel, PipelineExecutor, RunOutcome};
use research::FirecrawlClient;
use tracing::info;

use args::Cli;

/// Exit status when the run was not triggered because input was incomplete.
const EXIT_NOT_READY: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = match telemetry::init(cli.verbose, cli.log_json, cli.otlp_endpoint.as_deref())
    {
        Ok(telemetry) => telemetry,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let code = match execute(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    };

    telemetry.shutdown();
    code
}

async fn execute(cli: &Cli) -> Result<ExitCode> {
    let params = cli.research_params()?;
    let research = FirecrawlClient::new(cli.firecrawl_config())?;
    let generator = GeminiGenerator::new(cli.gemini_config()?);

    let request = match input::collect(cli)?.into_request() {
        Ok(request) => request,
        Err(not_ready) => {
            eprintln!("{not_ready}");
            return Ok(ExitCode::from(EXIT_NOT_READY));
        }
    };

    let executor = PipelineExecutor::with_params(research, generator, params);

    let (observer, mut events) = activity_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            eprintln!("{event}");
        }
    });

    eprintln!("Conducting research on \"{}\"...", request.topic);
    let outcome = executor.run(&request, &observer).await;
    drop(observer);
    printer.await.context("Activity printer task failed")?;

    match outcome {
        RunOutcome::Success(report) => {
            let mut stdout = std::io::stdout().lock();
            output::render(&mut stdout, &report, cli.show_draft)?;

            if !cli.no_save {
                let path = output::save_report(&cli.output_dir, &report)?;
                info!(run_id = %report.run_id, path = %path.display(), "Report saved");
                eprintln!("Report saved to {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Failure(failure) => {
            eprintln!("{failure}");
            Ok(ExitCode::FAILURE)
        }
    }
}
