//! Prompt assembly for the draft and enhancement generation passes.
//!
//! Both builders are pure: the same inputs always produce byte-identical
//! prompts.

use pipeline::{ResearchFindings, Source, Topic};

/// Number of leading sources considered for the prompt preview.
///
/// Truncation is only signalled through the total count in the prompt.
pub const SOURCE_PREVIEW_LIMIT: usize = 5;

/// Summary text used when a source has none.
pub const MISSING_SUMMARY: &str = "No summary available";

/// Renders the source preview block.
///
/// Takes the first [`SOURCE_PREVIEW_LIMIT`] sources, drops those without a URL,
/// and numbers the rest by their 1-based position in the full list.
pub fn source_preview(sources: &[Source]) -> String {
    sources
        .iter()
        .take(SOURCE_PREVIEW_LIMIT)
        .enumerate()
        .filter_map(|(index, source)| {
            let url = source.url.as_deref()?;
            let summary = source.summary.as_deref().unwrap_or(MISSING_SUMMARY);
            Some(format!("Source {}: {}\nSummary: {}", index + 1, url, summary))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Builds the prompt that turns raw research output into a structured draft.
pub fn draft_prompt(topic: &Topic, findings: &ResearchFindings) -> String {
    format!(
        r#"You are a research assistant analyzing the following research results on: "{topic}"

Final Analysis from research tool:
{analysis}

Sources ({count} total):
{sources}

Please organize these research findings into a well-structured academic report with:
1. Executive Summary
2. Key Findings
3. Detailed Analysis
4. Implications
5. Conclusion
6. References (properly cite all sources)

Format the report in Markdown.
"#,
        topic = topic,
        analysis = findings.final_analysis(),
        count = findings.sources_count(),
        sources = source_preview(findings.sources()),
    )
}

/// Builds the prompt that asks the generator to expand a draft report.
pub fn enhancement_prompt(topic: &Topic, draft: &str) -> String {
    format!(
        r#"RESEARCH TOPIC: {topic}

INITIAL RESEARCH REPORT:
{draft}

As an expert content enhancer specializing in research elaboration, please enhance this research report by:
1. Adding more detailed explanations of complex concepts
2. Including relevant examples, case studies, and real-world applications
3. Expanding on key points with additional context and nuance
4. Adding visual elements descriptions (charts, diagrams, infographics)
5. Incorporating latest trends and future predictions
6. Suggesting practical implications for different stakeholders

Maintain academic rigor and factual accuracy while making the report more comprehensive.
Format the enhanced report in Markdown.
"#
    )
}
