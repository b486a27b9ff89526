//! Security agent — prompt-injection scan plus standing safety defaults.
//!
//! The deterministic scan is this agent's baseline, not just its fallback:
//! it always runs, and the generative path only appends a secondary
//! analysis below it. Scan confidence and detection notes are never
//! overridden.

use crate::enhance::{self, Attempt, GenerativeSpec};
use crate::prompts;
use lcs_core::{AgentName, AgentResult, LcsConfig, Packet, Result, Source};
use lcs_llm::Gateway;
use tracing::warn;

/// Injection patterns matched as substrings of the lowercased input.
const INJECTION_PATTERNS: &[&str] = &[
    "ignore previous",
    "ignore above",
    "disregard",
    "system prompt",
    "you are now",
    "pretend you",
    "act as",
    "<script",
    "javascript:",
    "onerror=",
    "${",
    "{{",
    "__proto__",
    "constructor[",
];

const CLEAR_CONFIDENCE: f64 = 0.9;
const DETECTED_CONFIDENCE: f64 = 0.4;

/// Deterministic scan: a pure function of the packet. Always executed.
pub fn heuristic(pkt: &Packet) -> AgentResult {
    let lower = pkt.user_text.to_lowercase();
    let detected: Vec<&str> = INJECTION_PATTERNS
        .iter()
        .copied()
        .filter(|p| lower.contains(p))
        .collect();

    let mut notes = Vec::new();
    let mut lines = Vec::new();

    if detected.is_empty() {
        notes.push("No injection patterns detected.".to_string());
        lines.push("Security scan: CLEAR.".to_string());
        lines.push("No known prompt injection or tool-abuse patterns found.".to_string());
    } else {
        notes.push(format!(
            "Prompt injection patterns detected: {}",
            detected.join(", ")
        ));
        lines.push("SECURITY ALERT: Suspicious patterns found in input.".to_string());
        lines.push(format!("Detected: {}", detected.join(", ")));
        lines.push("Recommendation: Sanitize input. Do not pass to downstream tools.".to_string());
        lines.push("Confidence in safe execution: LOW.".to_string());
    }

    lines.push(String::new());
    lines.push("Standing safety defaults:".to_string());
    lines.push("- No shell execution from user input.".to_string());
    lines.push("- No eval() or dynamic code generation.".to_string());
    lines.push("- No network calls from user-supplied data.".to_string());
    lines.push("- All tool invocations require explicit gating.".to_string());

    AgentResult {
        agent: AgentName::Security,
        notes,
        proposed_answer: lines.join("\n"),
        confidence: if detected.is_empty() {
            CLEAR_CONFIDENCE
        } else {
            DETECTED_CONFIDENCE
        },
        source: Source::Heuristic,
    }
}

/// Run the security agent. Unlike the other agents, a successful generative
/// call augments the scan instead of replacing it.
pub async fn run(
    pkt: &Packet,
    config: &LcsConfig,
    gateway: &Gateway,
    memory_context: &str,
) -> Result<AgentResult> {
    let settings = config.agent(AgentName::Security);
    let spec = GenerativeSpec {
        system: prompts::SECURITY_SYSTEM,
        provider: settings.provider,
        model: config.model_for(settings.provider),
        temperature: settings.temperature,
        // Unused: the scan's verdict always stands.
        confidence: CLEAR_CONFIDENCE,
    };

    let mut result = heuristic(pkt);

    match enhance::attempt(gateway, &spec, pkt, memory_context).await {
        Attempt::Skipped => Ok(result),
        Attempt::Generated(text) => {
            result.notes.insert(0, spec.provenance());
            result.proposed_answer = format!(
                "{}\n\nSecondary analysis ({}):\n{}",
                result.proposed_answer,
                spec.provenance(),
                text
            );
            result.source = Source::Generated;
            Ok(result)
        }
        Attempt::Failed(reason) => {
            warn!(provider = %spec.provider, %reason, "security generative pass failed, scan verdict stands");
            result
                .notes
                .insert(0, enhance::degradation_note(spec.provider, &reason));
            Ok(result)
        }
    }
}
