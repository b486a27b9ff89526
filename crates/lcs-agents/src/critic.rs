//! Critic agent — failure modes and tightening recommendations.

use crate::enhance::{self, GenerativeSpec};
use crate::prompts;
use lcs_core::{AgentName, AgentResult, LcsConfig, Mode, Packet, Result, Risk, Source};
use lcs_llm::Gateway;

/// The critic reports the same confidence on both paths.
const CONFIDENCE: f64 = 0.75;

/// Deterministic path: a pure function of the packet.
pub fn heuristic(pkt: &Packet) -> AgentResult {
    let mut notes = Vec::new();
    let mut lines = Vec::new();

    lines.push("Failure mode analysis:".to_string());

    match pkt.risk {
        Risk::High => {
            notes.push("HIGH RISK - flagging for mandatory review.".to_string());
            lines.push("- CRITICAL: Input contains potentially dangerous patterns.".to_string());
            lines.push(
                "- Recommend: sandbox execution, input sanitization, manual review.".to_string(),
            );
        }
        Risk::Medium => {
            notes.push("Medium risk - additional checks advised.".to_string());
            lines.push("- Input is lengthy or complex; verify scope before proceeding.".to_string());
        }
        Risk::Low => {
            notes.push("Low risk - standard review.".to_string());
            lines.push("- No obvious failure vectors in input.".to_string());
        }
    }

    lines.push("General tightening recommendations:".to_string());
    lines.push("- Validate all outputs before surfacing to user.".to_string());
    lines.push("- Ensure deterministic behavior in synthesis.".to_string());
    lines.push("- Add fallback paths for unexpected agent failures.".to_string());

    if pkt.mode == Mode::HighEntropy {
        notes.push("High entropy mode - creative outputs need extra validation.".to_string());
        lines.push("- Creative mode active: verify coherence of synthesized output.".to_string());
    }

    AgentResult {
        agent: AgentName::Critic,
        notes,
        proposed_answer: lines.join("\n"),
        confidence: CONFIDENCE,
        source: Source::Heuristic,
    }
}

pub async fn run(
    pkt: &Packet,
    config: &LcsConfig,
    gateway: &Gateway,
    memory_context: &str,
) -> Result<AgentResult> {
    let settings = config.agent(AgentName::Critic);
    let spec = GenerativeSpec {
        system: prompts::CRITIC_SYSTEM,
        provider: settings.provider,
        model: config.model_for(settings.provider),
        temperature: settings.temperature,
        confidence: CONFIDENCE,
    };

    let base = heuristic(pkt);
    let attempt = enhance::attempt(gateway, &spec, pkt, memory_context).await;
    Ok(enhance::resolve(base, attempt, &spec))
}
