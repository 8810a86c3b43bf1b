//! Collects the topic and credentials and decides whether a run may start.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use orchestrator::RunRequest;
use pipeline::{Credentials, Topic};
use thiserror::Error;

use crate::args::Cli;

/// Why a run cannot be triggered yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NotReady {
    #[error("Please enter both API keys.")]
    MissingCredentials,
    #[error("Please enter a research topic.")]
    MissingTopic,
}

/// Unvalidated user input.
pub struct RawInputs {
    pub topic: String,
    pub research_key: String,
    pub generation_key: String,
}

impl RawInputs {
    /// Builds a run request only when both keys and the topic are non-blank.
    pub fn into_request(self) -> Result<RunRequest, NotReady> {
        let credentials = Credentials::from_raw(self.research_key, self.generation_key);
        if !credentials.is_complete() {
            return Err(NotReady::MissingCredentials);
        }
        let topic = Topic::new(self.topic).ok_or(NotReady::MissingTopic)?;
        Ok(RunRequest::new(topic, credentials))
    }
}

/// Takes each value from its flag, or prompts for it on an interactive
/// terminal. Non-interactive runs treat a missing value as blank.
pub fn collect(cli: &Cli) -> Result<RawInputs> {
    let interactive = std::io::stdin().is_terminal();

    let research_key = secret(cli.research_api_key.clone(), "Firecrawl API key", interactive)?;
    let generation_key = secret(cli.generation_api_key.clone(), "Gemini API key", interactive)?;

    let topic = match cli.topic.clone() {
        Some(topic) => topic,
        None if interactive => Input::<String>::new()
            .with_prompt("Enter your research topic")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read research topic")?,
        None => String::new(),
    };

    Ok(RawInputs {
        topic,
        research_key,
        generation_key,
    })
}

fn secret(flag: Option<String>, label: &str, interactive: bool) -> Result<String> {
    match flag {
        Some(value) => Ok(value),
        None if interactive => Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
            .with_context(|| format!("Failed to read {label}")),
        None => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(topic: &str, research: &str, generation: &str) -> RawInputs {
        RawInputs {
            topic: topic.into(),
            research_key: research.into(),
            generation_key: generation.into(),
        }
    }

    #[test]
    fn test_blank_credentials_block_the_run() {
        assert_eq!(
            inputs("Quantum computing", "", "gen").into_request().err(),
            Some(NotReady::MissingCredentials)
        );
        assert_eq!(
            inputs("Quantum computing", "fc", "  ").into_request().err(),
            Some(NotReady::MissingCredentials)
        );
    }

    #[test]
    fn test_blank_topic_blocks_the_run() {
        assert_eq!(
            inputs(" ", "fc", "gen").into_request().err(),
            Some(NotReady::MissingTopic)
        );
    }

    #[test]
    fn test_complete_input_builds_request() {
        let request = inputs("Quantum computing", "fc", "gen").into_request().unwrap();
        assert_eq!(request.topic.as_str(), "Quantum computing");
        assert!(request.credentials.is_complete());
    }
}
