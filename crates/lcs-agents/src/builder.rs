//! Builder agent — implementation plans and scaffolding guidance.

use crate::enhance::{self, GenerativeSpec};
use crate::prompts;
use lcs_core::{AgentName, AgentResult, Intent, LcsConfig, Packet, Result, Risk, Source};
use lcs_llm::Gateway;

/// Confidence reported when the generative path succeeds.
const GENERATIVE_CONFIDENCE: f64 = 0.85;

/// Deterministic path: a pure function of the packet.
pub fn heuristic(pkt: &Packet) -> AgentResult {
    let mut notes = Vec::new();
    let mut lines = Vec::new();

    if pkt.intent == Intent::Build || pkt.intent == Intent::Design {
        notes.push("User request maps to a constructive task.".to_string());
        lines.push(format!("Implementation plan for: \"{}\"", pkt.user_text));
        lines.push("1. Define interfaces and data contracts.".to_string());
        lines.push("2. Scaffold module structure.".to_string());
        lines.push("3. Implement core logic with safety checks.".to_string());
        lines.push("4. Add tests and trace logging.".to_string());
    } else {
        notes.push("Non-build intent; providing structural guidance.".to_string());
        lines.push(format!("Structural analysis of: \"{}\"", pkt.user_text));
        lines.push("- Identify key components.".to_string());
        lines.push("- Map dependencies.".to_string());
    }

    if pkt.risk == Risk::High {
        notes.push("High risk detected - recommending gated execution.".to_string());
    }

    AgentResult {
        agent: AgentName::Builder,
        notes,
        proposed_answer: lines.join("\n"),
        confidence: if pkt.intent == Intent::Build { 0.85 } else { 0.6 },
        source: Source::Heuristic,
    }
}

/// Run the builder: heuristic base, generative enhancement when available.
/// Generative failures are demoted to the heuristic result, never raised.
pub async fn run(
    pkt: &Packet,
    config: &LcsConfig,
    gateway: &Gateway,
    memory_context: &str,
) -> Result<AgentResult> {
    let settings = config.agent(AgentName::Builder);
    let spec = GenerativeSpec {
        system: prompts::BUILDER_SYSTEM,
        provider: settings.provider,
        model: config.model_for(settings.provider),
        temperature: settings.temperature,
        confidence: GENERATIVE_CONFIDENCE,
    };

    let base = heuristic(pkt);
    let attempt = enhance::attempt(gateway, &spec, pkt, memory_context).await;
    Ok(enhance::resolve(base, attempt, &spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcs_core::route;

    #[test]
    fn build_intent_yields_numbered_plan() {
        let result = heuristic(&route("build a web server"));
        assert_eq!(result.agent, AgentName::Builder);
        assert_eq!(result.confidence, 0.85);
        assert!(result.proposed_answer.contains("1. Define interfaces"));
        assert!(result.proposed_answer.contains("4. Add tests"));
        assert_eq!(result.source, Source::Heuristic);
    }

    #[test]
    fn design_intent_gets_plan_at_lower_confidence() {
        let result = heuristic(&route("design a schema"));
        assert_eq!(result.confidence, 0.6);
        assert!(result.proposed_answer.contains("Implementation plan"));
    }

    #[test]
    fn non_build_intent_yields_structural_analysis() {
        let result = heuristic(&route("hello there"));
        assert_eq!(result.confidence, 0.6);
        assert!(result.proposed_answer.contains("Structural analysis"));
        assert!(result.proposed_answer.contains("- Identify key components."));
    }

    #[test]
    fn high_risk_appends_advisory_note() {
        let result = heuristic(&route("build a sudo wrapper"));
        assert!(result.notes.iter().any(|n| n.contains("High risk")));
    }
}
