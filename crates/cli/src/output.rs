//! Report rendering and the downloadable markdown file.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use orchestrator::ResearchReport;
use pipeline::Topic;

/// File name for a topic's report: `{sanitized_topic}_report.md`.
///
/// Spaces, path separators, and characters that are reserved in file names on
/// common platforms become `_`.
pub fn report_file_name(topic: &Topic) -> String {
    let stem: String = topic
        .as_str()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim_matches('.');
    let stem = if stem.is_empty() { "research" } else { stem };
    format!("{stem}_report.md")
}

/// Writes the enhanced report into `dir`, creating it if needed.
pub fn save_report(dir: &Path, report: &ResearchReport) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(report_file_name(&report.topic));
    std::fs::write(&path, report.enhanced.as_str())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(path)
}

/// Prints the report (and optionally the draft) as markdown.
pub fn render(out: &mut impl Write, report: &ResearchReport, show_draft: bool) -> Result<()> {
    if show_draft {
        writeln!(out, "## Initial Research Report\n")?;
        writeln!(out, "{}\n", report.draft)?;
        writeln!(out, "---\n")?;
    }
    writeln!(out, "## Enhanced Research Report\n")?;
    writeln!(out, "{}", report.enhanced)?;
    Ok(())
}
