//! Markdown and JSON report generation.
//!
//! A partially failed analysis still renders in full: failed agents are
//! marked as unavailable with their failure detail, never silently
//! omitted.

use crate::models::{AnalysisResult, ContractReport, ReportMetadata};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &ContractReport) -> String {
    let mut output = String::new();

    output.push_str("# Contract Analysis Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));

    for result in report.agents.entries() {
        output.push_str(&generate_agent_section(result));
    }

    output.push_str("---\n\n");
    output.push_str(&generate_agent_section(&report.executive));

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Document:** `{}`\n", metadata.source_file));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Model Used:** `{}`\n", metadata.model_used));
    section.push_str(&format!(
        "- **Extracted Characters:** {}\n",
        metadata.extracted_chars
    ));
    if metadata.agents_failed > 0 {
        section.push_str(&format!(
            "- **Agents Failed:** {} of 3\n",
            metadata.agents_failed
        ));
    }
    section.push_str(&format!(
        "- **Analysis Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate one agent's section, success or failure alike.
fn generate_agent_section(result: &AnalysisResult) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "## {} {}\n\n",
        result.kind.emoji(),
        result.kind.title()
    ));

    match result.content() {
        Some(content) => {
            section.push_str(content);
            section.push_str("\n\n");
        }
        None => {
            section.push_str(&format!(
                "> ⚠️ **{} agent unavailable.** {}\n\n",
                result.kind,
                result.error_detail().unwrap_or("Unknown failure.")
            ));
        }
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by Contraudit*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &ContractReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgentKind, AggregateReport};
    use chrono::Utc;

    fn create_test_report(legal_failed: bool) -> ContractReport {
        let legal = if legal_failed {
            AnalysisResult::failure(AgentKind::Legal, "request timed out after 120s")
        } else {
            AnalysisResult::success(AgentKind::Legal, "Governing law: Delaware.")
        };

        ContractReport {
            metadata: ReportMetadata {
                source_file: "lease.pdf".to_string(),
                analysis_date: Utc::now(),
                model_used: "mistral-large-latest".to_string(),
                extracted_chars: 12345,
                agents_failed: if legal_failed { 1 } else { 0 },
                duration_seconds: 8.4,
            },
            agents: AggregateReport::new(
                AnalysisResult::success(AgentKind::Structure, "Ten sections, logical flow."),
                legal,
                AnalysisResult::success(AgentKind::Negotiation, "Push on the renewal clause."),
            ),
            executive: AnalysisResult::success(AgentKind::Manager, "Sign with changes."),
        }
    }

    #[test]
    fn test_markdown_report_sections() {
        let markdown = generate_markdown_report(&create_test_report(false));

        assert!(markdown.contains("# Contract Analysis Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("Contract Structure Analysis"));
        assert!(markdown.contains("Legal Analysis"));
        assert!(markdown.contains("Negotiation Analysis"));
        assert!(markdown.contains("Consolidated Executive Report"));
        assert!(markdown.contains("Sign with changes."));
        assert!(!markdown.contains("unavailable"));
    }

    #[test]
    fn test_markdown_renders_failed_agent_as_unavailable() {
        let markdown = generate_markdown_report(&create_test_report(true));

        assert!(markdown.contains("**Legal agent unavailable.**"));
        assert!(markdown.contains("request timed out after 120s"));
        assert!(markdown.contains("**Agents Failed:** 1 of 3"));
        // Siblings still render in full.
        assert!(markdown.contains("Ten sections, logical flow."));
        assert!(markdown.contains("Push on the renewal clause."));
    }

    #[test]
    fn test_json_report_shape() {
        let json = generate_json_report(&create_test_report(true)).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"agents\""));
        assert!(json.contains("\"executive\""));
        assert!(json.contains("\"status\": \"failure\""));
        assert!(json.contains("\"detail\": \"request timed out after 120s\""));
    }
}
