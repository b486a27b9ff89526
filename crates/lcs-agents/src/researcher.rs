//! Researcher agent — best practices and domain knowledge.

use crate::enhance::{self, GenerativeSpec};
use crate::prompts;
use lcs_core::{AgentName, AgentResult, Domain, Intent, LcsConfig, Packet, Result, Source};
use lcs_llm::Gateway;

const GENERATIVE_CONFIDENCE: f64 = 0.8;

/// Deterministic path: a pure function of the packet.
pub fn heuristic(pkt: &Packet) -> AgentResult {
    let mut notes = Vec::new();
    let mut lines = Vec::new();

    if pkt.domain == Domain::AiArchitecture {
        notes.push("AI/architecture domain detected - applying specialized knowledge.".to_string());
        lines.push("Best practices for AI system design:".to_string());
        lines.push("- Separate routing, execution, and synthesis layers.".to_string());
        lines.push("- Keep agent outputs structured and typed.".to_string());
        lines.push("- Log all decisions for auditability.".to_string());
        lines.push("- Treat all user input as untrusted.".to_string());
    } else {
        notes.push("General domain - applying broad heuristics.".to_string());
        lines.push("General best practices:".to_string());
        lines.push("- Break the problem into sub-tasks.".to_string());
        lines.push("- Validate assumptions before executing.".to_string());
        lines.push("- Document decisions and trade-offs.".to_string());
    }

    if pkt.intent == Intent::Research {
        notes.push("Research intent - emphasizing breadth.".to_string());
        lines.push("- Consider multiple approaches before committing.".to_string());
        lines.push("- Gather evidence from diverse sources.".to_string());
    }

    AgentResult {
        agent: AgentName::Researcher,
        notes,
        proposed_answer: lines.join("\n"),
        confidence: if pkt.intent == Intent::Research { 0.8 } else { 0.65 },
        source: Source::Heuristic,
    }
}

pub async fn run(
    pkt: &Packet,
    config: &LcsConfig,
    gateway: &Gateway,
    memory_context: &str,
) -> Result<AgentResult> {
    let settings = config.agent(AgentName::Researcher);
    let spec = GenerativeSpec {
        system: prompts::RESEARCHER_SYSTEM,
        provider: settings.provider,
        model: config.model_for(settings.provider),
        temperature: settings.temperature,
        confidence: GENERATIVE_CONFIDENCE,
    };

    let base = heuristic(pkt);
    let attempt = enhance::attempt(gateway, &spec, pkt, memory_context).await;
    Ok(enhance::resolve(base, attempt, &spec))
}
