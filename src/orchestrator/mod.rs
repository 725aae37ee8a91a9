//! Fan-out/join coordination for the first-stage agents.
//!
//! The orchestrator dispatches the shared payload to the three
//! first-stage agents concurrently, waits for all of them (a join
//! barrier, not a race), and assembles the aggregate report. `run`
//! itself never fails; partial failure only ever appears inside the
//! report's entries.

use crate::agents::AnalysisAgent;
use crate::llm::ChatModel;
use crate::models::{AgentKind, AggregateReport, TextPayload};
use futures::future::join3;
use std::sync::Arc;
use tracing::info;

pub struct Orchestrator {
    structure: AnalysisAgent,
    legal: AnalysisAgent,
    negotiation: AnalysisAgent,
}

impl Orchestrator {
    /// Build the three first-stage agents over a shared chat model.
    pub fn new(client: Arc<dyn ChatModel>, max_prompt_chars: usize) -> Self {
        Self {
            structure: AnalysisAgent::new(AgentKind::Structure, client.clone(), max_prompt_chars),
            legal: AnalysisAgent::new(AgentKind::Legal, client.clone(), max_prompt_chars),
            negotiation: AnalysisAgent::new(AgentKind::Negotiation, client, max_prompt_chars),
        }
    }

    /// Build an orchestrator from pre-constructed agents, in dispatch
    /// order (Structure, Legal, Negotiation).
    #[allow(dead_code)] // Used by tests to inject per-agent stubs
    pub fn from_agents(
        structure: AnalysisAgent,
        legal: AnalysisAgent,
        negotiation: AnalysisAgent,
    ) -> Self {
        Self {
            structure,
            legal,
            negotiation,
        }
    }

    /// Fan the payload out to all three agents and join their results.
    ///
    /// The agents suspend only while awaiting their upstream call, so
    /// total wall clock is bounded by the slowest agent, not the sum.
    /// Every agent terminates with a result (its `analyze` converts
    /// faults to `Failure` data), so the returned report always carries
    /// exactly one entry per first-stage kind.
    pub async fn run(&self, payload: &TextPayload) -> AggregateReport {
        info!(
            chars = payload.char_count(),
            "Running first-stage agents concurrently"
        );

        let (structure, legal, negotiation) = join3(
            self.structure.analyze(payload),
            self.legal.analyze(payload),
            self.negotiation.analyze(payload),
        )
        .await;

        let report = AggregateReport::new(structure, legal, negotiation);
        info!(
            succeeded = report.success_count(),
            failed = report.failed_count(),
            "First-stage analysis complete"
        );

        report
    }
}
