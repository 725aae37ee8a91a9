//! Data models for the contract analyzer.
//!
//! This module contains the core data structures used throughout the
//! application: the extracted document payload, per-agent analysis
//! results, and the aggregated report handed to the manager stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies which analysis agent produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// Document structure and organization analysis
    Structure,
    /// Legal compliance and risk analysis
    Legal,
    /// Negotiation leverage analysis
    Negotiation,
    /// Second-stage consolidation of the other three
    Manager,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Structure => write!(f, "Structure"),
            AgentKind::Legal => write!(f, "Legal"),
            AgentKind::Negotiation => write!(f, "Negotiation"),
            AgentKind::Manager => write!(f, "Manager"),
        }
    }
}

impl AgentKind {
    /// The three first-stage kinds, in dispatch order.
    pub const FIRST_STAGE: [AgentKind; 3] = [
        AgentKind::Structure,
        AgentKind::Legal,
        AgentKind::Negotiation,
    ];

    /// Human-readable section title used in reports.
    pub fn title(&self) -> &'static str {
        match self {
            AgentKind::Structure => "Contract Structure Analysis",
            AgentKind::Legal => "Legal Analysis",
            AgentKind::Negotiation => "Negotiation Analysis",
            AgentKind::Manager => "Consolidated Executive Report",
        }
    }

    /// Returns an emoji representation of the agent.
    pub fn emoji(&self) -> &'static str {
        match self {
            AgentKind::Structure => "🏗️",
            AgentKind::Legal => "⚖️",
            AgentKind::Negotiation => "🤝",
            AgentKind::Manager => "👔",
        }
    }
}

/// Text extracted from a source document.
///
/// Immutable once constructed; it is the sole shared input to the
/// first-stage agents and is only ever read by them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPayload(String);

impl TextPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters (not bytes) in the payload.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for TextPayload {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Outcome of a single agent invocation.
///
/// Failures are returned as data, never raised across the agent
/// boundary. This is what keeps one agent's upstream error from
/// aborting its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisOutcome {
    /// The agent produced an analysis.
    Success { content: String },
    /// The upstream call failed; `detail` describes the cause.
    Failure { detail: String },
}

/// Result of one agent invocation, tagged with the agent that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub kind: AgentKind,
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
}

impl AnalysisResult {
    pub fn success(kind: AgentKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            outcome: AnalysisOutcome::Success {
                content: content.into(),
            },
        }
    }

    pub fn failure(kind: AgentKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            outcome: AnalysisOutcome::Failure {
                detail: detail.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, AnalysisOutcome::Success { .. })
    }

    /// The analysis text, if this result succeeded.
    pub fn content(&self) -> Option<&str> {
        match &self.outcome {
            AnalysisOutcome::Success { content } => Some(content),
            AnalysisOutcome::Failure { .. } => None,
        }
    }

    /// The failure detail, if this result failed.
    pub fn error_detail(&self) -> Option<&str> {
        match &self.outcome {
            AnalysisOutcome::Success { .. } => None,
            AnalysisOutcome::Failure { detail } => Some(detail),
        }
    }
}

/// The complete set of first-stage results.
///
/// One entry per first-stage kind is guaranteed structurally: the three
/// entries are named fields, so a missing entry cannot be constructed.
/// The report is returned by value from the orchestrator and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub structure: AnalysisResult,
    pub legal: AnalysisResult,
    pub negotiation: AnalysisResult,
}

impl AggregateReport {
    pub fn new(
        structure: AnalysisResult,
        legal: AnalysisResult,
        negotiation: AnalysisResult,
    ) -> Self {
        debug_assert_eq!(structure.kind, AgentKind::Structure);
        debug_assert_eq!(legal.kind, AgentKind::Legal);
        debug_assert_eq!(negotiation.kind, AgentKind::Negotiation);
        Self {
            structure,
            legal,
            negotiation,
        }
    }

    /// Look up a first-stage entry by kind. Returns `None` for `Manager`.
    pub fn get(&self, kind: AgentKind) -> Option<&AnalysisResult> {
        match kind {
            AgentKind::Structure => Some(&self.structure),
            AgentKind::Legal => Some(&self.legal),
            AgentKind::Negotiation => Some(&self.negotiation),
            AgentKind::Manager => None,
        }
    }

    /// All three entries, in dispatch order.
    pub fn entries(&self) -> [&AnalysisResult; 3] {
        [&self.structure, &self.legal, &self.negotiation]
    }

    /// Entries that produced an analysis.
    pub fn successes(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.entries().into_iter().filter(|r| r.is_success())
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failed_count(&self) -> usize {
        3 - self.success_count()
    }
}

/// Metadata about one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the analyzed document.
    pub source_file: String,
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// Name of the LLM model used.
    pub model_used: String,
    /// Number of characters extracted from the document.
    pub extracted_chars: usize,
    /// Number of first-stage agents that failed.
    pub agents_failed: usize,
    /// Duration of the analysis in seconds.
    pub duration_seconds: f64,
}

/// The complete contract analysis: both stages plus run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractReport {
    /// Metadata about the run.
    pub metadata: ReportMetadata,
    /// First-stage agent results.
    pub agents: AggregateReport,
    /// The manager's consolidated result (kind is always `Manager`).
    pub executive: AnalysisResult,
}

impl ContractReport {
    /// The executive summary text, if the manager stage succeeded.
    pub fn executive_summary(&self) -> Option<&str> {
        self.executive.content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_kind_display() {
        assert_eq!(AgentKind::Structure.to_string(), "Structure");
        assert_eq!(AgentKind::Legal.to_string(), "Legal");
        assert_eq!(AgentKind::Negotiation.to_string(), "Negotiation");
        assert_eq!(AgentKind::Manager.to_string(), "Manager");
    }

    #[test]
    fn test_first_stage_order() {
        assert_eq!(
            AgentKind::FIRST_STAGE,
            [
                AgentKind::Structure,
                AgentKind::Legal,
                AgentKind::Negotiation
            ]
        );
    }

    #[test]
    fn test_payload_char_count() {
        let payload = TextPayload::new("héllo");
        assert_eq!(payload.char_count(), 5);
        assert!(!payload.is_empty());
        assert!(TextPayload::new("").is_empty());
    }

    #[test]
    fn test_result_accessors() {
        let ok = AnalysisResult::success(AgentKind::Legal, "fine print");
        assert!(ok.is_success());
        assert_eq!(ok.content(), Some("fine print"));
        assert_eq!(ok.error_detail(), None);

        let err = AnalysisResult::failure(AgentKind::Legal, "timed out");
        assert!(!err.is_success());
        assert_eq!(err.content(), None);
        assert_eq!(err.error_detail(), Some("timed out"));
    }

    fn make_report(legal_ok: bool) -> AggregateReport {
        let legal = if legal_ok {
            AnalysisResult::success(AgentKind::Legal, "legal analysis")
        } else {
            AnalysisResult::failure(AgentKind::Legal, "upstream error")
        };
        AggregateReport::new(
            AnalysisResult::success(AgentKind::Structure, "structure analysis"),
            legal,
            AnalysisResult::success(AgentKind::Negotiation, "negotiation analysis"),
        )
    }

    #[test]
    fn test_report_lookup_by_kind() {
        let report = make_report(true);
        assert_eq!(
            report.get(AgentKind::Negotiation).and_then(|r| r.content()),
            Some("negotiation analysis")
        );
        assert!(report.get(AgentKind::Manager).is_none());
    }

    #[test]
    fn test_report_entries_in_dispatch_order() {
        let report = make_report(true);
        let kinds: Vec<AgentKind> = report.entries().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, AgentKind::FIRST_STAGE.to_vec());
    }

    #[test]
    fn test_report_success_counts() {
        let report = make_report(false);
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failed_count(), 1);
        let successful: Vec<AgentKind> = report.successes().map(|r| r.kind).collect();
        assert_eq!(
            successful,
            vec![AgentKind::Structure, AgentKind::Negotiation]
        );
    }

    #[test]
    fn test_result_serialization_shape() {
        let ok = AnalysisResult::success(AgentKind::Structure, "sections found");
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["kind"], "structure");
        assert_eq!(json["status"], "success");
        assert_eq!(json["content"], "sections found");

        let err = AnalysisResult::failure(AgentKind::Manager, "api error");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["detail"], "api error");
    }
}
