//! Analysis agents.
//!
//! Each first-stage agent is a specialization of [`AnalysisAgent`] over
//! the closed [`AgentKind`] enum: same call shape, different
//! instructions. The [`ManagerAgent`] is the second-stage consolidator
//! that reads the aggregate report rather than the raw contract text.
//!
//! Both agent types are infallible at the signature level: every
//! upstream error is converted into a `Failure` result before it
//! crosses the boundary, so one agent can never abort its siblings.

use crate::llm::ChatModel;
use crate::models::{AgentKind, AggregateReport, AnalysisResult, TextPayload};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default character budget for contract text in a prompt.
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 8000;

const STRUCTURE_INSTRUCTIONS: &str = "\
You are a Contract Structure Analysis Expert. Analyze contracts for structure and organization.

Provide a brief, readable analysis covering:
- **Sections Found**: List main sections you identified
- **Document Flow**: Is the contract logically organized?
- **Missing Sections**: Any standard sections that are missing?
- **Structure Score**: Rate 1-10 with brief explanation

Keep your response concise and easy to read. Use bullet points and short paragraphs.";

const LEGAL_INSTRUCTIONS: &str = "\
You are a Legal Analysis Expert. Analyze contracts for legal risks and compliance.

Provide a brief, readable analysis covering:
- **Governing Law**: What jurisdiction governs this contract?
- **Key Risks**: Top 3-5 legal risks identified
- **Red Flags**: Any concerning clauses or terms?
- **Legal Score**: Rate 1-10 with brief explanation

Keep your response concise and easy to read. Use bullet points and short paragraphs.";

const NEGOTIATION_INSTRUCTIONS: &str = "\
You are a Contract Negotiation Expert. Analyze contracts for negotiation opportunities.

Provide a brief, readable analysis covering:
- **Favorable Terms**: What's good in this contract?
- **Unfavorable Terms**: What needs negotiation?
- **Quick Wins**: Easy changes likely to be accepted
- **Negotiation Score**: Rate 1-10 with brief explanation

Keep your response concise and easy to read. Use bullet points and short paragraphs.";

const MANAGER_INSTRUCTIONS: &str = "\
You are a Contract Analysis Manager. Consolidate findings from other agents into an executive summary.

Provide a brief, readable report covering:
- **Executive Summary**: 2-3 sentence overview
- **Overall Score**: Rate 1-10 for contract quality
- **Top 3 Concerns**: Most important issues to address
- **Recommendation**: Should they sign? (Yes/No/With changes)
- **Next Steps**: 3-5 action items

Keep your response concise and actionable. Use bullet points and short paragraphs.";

/// Truncate text to at most `max_chars` characters on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// A first-stage analysis agent.
///
/// Holds no mutable state; concurrent invocations share only the
/// chat model handle and the immutable payload borrow.
pub struct AnalysisAgent {
    kind: AgentKind,
    client: Arc<dyn ChatModel>,
    max_prompt_chars: usize,
}

impl AnalysisAgent {
    /// Create an agent for one of the first-stage kinds.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is `Manager`; use [`ManagerAgent`] for the
    /// consolidation stage.
    pub fn new(kind: AgentKind, client: Arc<dyn ChatModel>, max_prompt_chars: usize) -> Self {
        assert_ne!(kind, AgentKind::Manager, "Manager is not a first-stage agent");
        Self {
            kind,
            client,
            max_prompt_chars,
        }
    }

    fn instructions(&self) -> &'static str {
        match self.kind {
            AgentKind::Structure => STRUCTURE_INSTRUCTIONS,
            AgentKind::Legal => LEGAL_INSTRUCTIONS,
            AgentKind::Negotiation => NEGOTIATION_INSTRUCTIONS,
            AgentKind::Manager => unreachable!("checked in constructor"),
        }
    }

    fn build_prompt(&self, payload: &TextPayload) -> String {
        let excerpt = truncate_chars(payload.as_str(), self.max_prompt_chars);
        let focus = match self.kind {
            AgentKind::Structure => "structure",
            AgentKind::Legal => "legal risks",
            AgentKind::Negotiation => "negotiation opportunities",
            AgentKind::Manager => unreachable!("checked in constructor"),
        };

        format!(
            "Analyze this contract for {} briefly:\n\n{}\n\n\
             Provide a short, readable summary.",
            focus, excerpt
        )
    }

    /// Run the analysis. Performs exactly one chat model call.
    ///
    /// Never returns an error: upstream faults become a `Failure`
    /// result tagged with this agent's kind. An empty payload is a
    /// valid degenerate input and is sent to the model as-is.
    pub async fn analyze(&self, payload: &TextPayload) -> AnalysisResult {
        let prompt = self.build_prompt(payload);
        debug!(agent = %self.kind, prompt_chars = prompt.len(), "Dispatching analysis");

        match self.client.invoke(self.instructions(), &prompt).await {
            Ok(content) => AnalysisResult::success(self.kind, content),
            Err(e) => {
                warn!(agent = %self.kind, error = %e, "Agent analysis failed");
                AnalysisResult::failure(self.kind, e.to_string())
            }
        }
    }
}

/// The second-stage consolidator.
///
/// Consumes the complete aggregate report, never the raw contract text,
/// and is only ever run after the first-stage join barrier.
pub struct ManagerAgent {
    client: Arc<dyn ChatModel>,
}

impl ManagerAgent {
    pub fn new(client: Arc<dyn ChatModel>) -> Self {
        Self { client }
    }

    fn build_prompt(report: &AggregateReport) -> String {
        // Failed entries are acknowledged with a placeholder rather than
        // blocking consolidation; the manager degrades gracefully down
        // to zero successful inputs.
        let section = |kind: AgentKind| -> String {
            report
                .get(kind)
                .and_then(|r| r.content())
                .map(str::to_string)
                .unwrap_or_else(|| format!("No {} analysis available", kind.to_string().to_lowercase()))
        };

        format!(
            "Consolidate these agent findings into a brief executive summary:\n\n\
             **Structure Analysis:**\n{}\n\n\
             **Legal Analysis:**\n{}\n\n\
             **Negotiation Analysis:**\n{}\n\n\
             Provide a short, actionable summary with your recommendation.",
            section(AgentKind::Structure),
            section(AgentKind::Legal),
            section(AgentKind::Negotiation),
        )
    }

    /// Consolidate the first-stage results into an executive summary.
    ///
    /// Only the manager's own upstream call failure yields a `Failure`
    /// result; a report full of failed entries is still consolidated.
    pub async fn consolidate(&self, report: &AggregateReport) -> AnalysisResult {
        let prompt = Self::build_prompt(report);
        debug!(
            successes = report.success_count(),
            prompt_chars = prompt.len(),
            "Dispatching consolidation"
        );

        match self.client.invoke(MANAGER_INSTRUCTIONS, &prompt).await {
            Ok(content) => AnalysisResult::success(AgentKind::Manager, content),
            Err(e) => {
                warn!(error = %e, "Manager consolidation failed");
                AnalysisResult::failure(AgentKind::Manager, e.to_string())
            }
        }
    }
}
