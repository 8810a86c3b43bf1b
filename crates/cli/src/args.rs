//! Command-line arguments and their conversion into typed configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use llm::GeminiConfig;
use pipeline::{ConfigError, ModelId, ResearchParams};
use research::FirecrawlConfig;

/// Research a topic on the web and turn the findings into an enhanced
/// markdown report.
///
/// API keys not given as flags are prompted for with masked input.
#[derive(Parser)]
#[command(name = "deep-research", version, about, long_about = None)]
pub struct Cli {
    /// Research topic (prompted for when omitted)
    pub topic: Option<String>,

    /// Firecrawl API key
    #[arg(long, value_name = "KEY")]
    pub research_api_key: Option<String>,

    /// Gemini API key
    #[arg(long, value_name = "KEY")]
    pub generation_api_key: Option<String>,

    /// Maximum crawl depth of the research job
    #[arg(long, default_value_t = ResearchParams::DEFAULT_MAX_DEPTH)]
    pub max_depth: u32,

    /// Time limit of the research job, in seconds
    #[arg(long, value_name = "SECS", default_value_t = ResearchParams::DEFAULT_TIME_LIMIT.as_secs())]
    pub time_limit: u64,

    /// Maximum number of URLs the research job may visit
    #[arg(long, default_value_t = ResearchParams::DEFAULT_MAX_URLS)]
    pub max_urls: u32,

    /// Research API root
    #[arg(long, value_name = "URL", default_value = research::DEFAULT_BASE_URL)]
    pub research_base_url: String,

    /// Delay between research status polls, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 2000)]
    pub poll_interval_ms: u64,

    /// Generation model identifier
    #[arg(long, default_value = ModelId::DEFAULT)]
    pub model: String,

    /// Generation API root
    #[arg(long, value_name = "URL", default_value = llm::DEFAULT_BASE_URL)]
    pub generation_base_url: String,

    /// Directory the report file is written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Print the report without writing a file
    #[arg(long)]
    pub no_save: bool,

    /// Also print the first-pass draft report
    #[arg(long)]
    pub show_draft: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Export traces to this OTLP/gRPC endpoint (e.g. http://localhost:4317)
    #[arg(long, value_name = "URL")]
    pub otlp_endpoint: Option<String>,
}

impl Cli {
    /// Research limits from the command line.
    pub fn research_params(&self) -> Result<ResearchParams, ConfigError> {
        ResearchParams::new(
            self.max_depth,
            Duration::from_secs(self.time_limit),
            self.max_urls,
        )
    }

    /// Research adapter settings. Validated when the client is built.
    pub fn firecrawl_config(&self) -> FirecrawlConfig {
        FirecrawlConfig {
            base_url: self.research_base_url.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            ..FirecrawlConfig::default()
        }
    }

    /// Generation adapter settings.
    pub fn gemini_config(&self) -> Result<GeminiConfig, ConfigError> {
        let model = ModelId::new(self.model.as_str())
            .ok_or_else(|| ConfigError::invalid("model", "must not be empty"))?;
        Ok(GeminiConfig {
            base_url: self.generation_base_url.clone(),
            model,
            ..GeminiConfig::default()
        })
    }
}
