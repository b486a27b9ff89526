//! Kernel synthesizer — merges all agent results into one report.
//!
//! The deterministic variant is a pure function of (packet, results):
//! repeated calls produce byte-identical summaries. The generative variant
//! mirrors the agents' pattern and falls back to the deterministic output
//! with an error banner when the call fails.

use crate::prompts;
use lcs_core::{AgentName, AgentResult, LcsConfig, Packet, Source, SynthesisOutput};
use lcs_llm::{CompletionRequest, Gateway};
use tracing::{debug, warn};

/// Agents at or above this confidence contribute notes to consensus.
const CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Every summary ends by pointing at the full-trace command.
const TRACE_POINTER: &str = "- Run `lcs trace` to inspect the full execution trace.";

/// Synthesize with the configured generative pass when available, else
/// deterministically. Never fails: generative errors degrade to the
/// deterministic output with a banner on the summary.
pub async fn synthesize(
    pkt: &Packet,
    results: &[AgentResult],
    config: &LcsConfig,
    gateway: &Gateway,
) -> SynthesisOutput {
    let settings = &config.synthesis;
    if !gateway.is_available(settings.provider) {
        return synthesize_heuristic(pkt, results);
    }

    let request = CompletionRequest::new(
        prompts::SYNTHESIS_SYSTEM,
        build_synthesis_prompt(pkt, results),
        settings.model.clone(),
        settings.temperature,
    )
    .with_max_tokens(2048);

    match gateway.complete(settings.provider, request).await {
        Ok(text) => {
            debug!(run_id = %pkt.run_id, "generative synthesis complete");
            SynthesisOutput {
                context: context_line(pkt),
                consensus: vec![format!(
                    "Synthesized by {}:{} from {} agent results.",
                    settings.provider,
                    settings.model,
                    results.len()
                )],
                next_steps: vec![
                    "- Review the synthesized report above.".to_string(),
                    TRACE_POINTER.to_string(),
                ],
                summary: text,
                source: Source::Generated,
            }
        }
        Err(e) => {
            warn!(run_id = %pkt.run_id, error = %e, "generative synthesis failed, using deterministic output");
            let mut out = synthesize_heuristic(pkt, results);
            out.summary = format!("[synthesis degraded: {e}]\n\n{}", out.summary);
            out
        }
    }
}

/// Deterministic synthesis. Pure function of its inputs.
pub fn synthesize_heuristic(pkt: &Packet, results: &[AgentResult]) -> SynthesisOutput {
    let context = context_line(pkt);
    let consensus = build_consensus(results);
    let next_steps = build_next_steps(results);
    let summary = render_summary(&context, results, &consensus, &next_steps);

    SynthesisOutput {
        context,
        consensus,
        next_steps,
        summary,
        source: Source::Heuristic,
    }
}

fn context_line(pkt: &Packet) -> String {
    format!(
        "[lcs] intent={} domain={} mode={} risk={}",
        pkt.intent, pkt.domain, pkt.mode, pkt.risk
    )
}

/// Deduplicated notes from above-threshold agents, first occurrence wins.
/// A below-threshold security result is excluded from the general set but
/// its warning is unconditionally prepended.
fn build_consensus(results: &[AgentResult]) -> Vec<String> {
    let mut consensus: Vec<String> = Vec::new();
    for result in results {
        if result.confidence < CONFIDENCE_THRESHOLD {
            continue;
        }
        for note in &result.notes {
            if !consensus.contains(note) {
                consensus.push(note.clone());
            }
        }
    }

    let security = results.iter().find(|r| r.agent == AgentName::Security);
    if let Some(security) = security {
        if security.confidence < CONFIDENCE_THRESHOLD {
            consensus.insert(0, format!("SECURITY WARNING: {}", security.notes.join("; ")));
        }
    }

    consensus
}

/// Actionable lines: builder's plan steps, then the critic's
/// Recommend/Add/Validate lines, then the standing trace pointer.
fn build_next_steps(results: &[AgentResult]) -> Vec<String> {
    let mut steps: Vec<String> = Vec::new();

    if let Some(builder) = results.iter().find(|r| r.agent == AgentName::Builder) {
        steps.extend(
            builder
                .proposed_answer
                .lines()
                .map(str::trim)
                .filter(|l| is_numbered_step(l) || l.starts_with('-'))
                .map(String::from),
        );
    }

    if let Some(critic) = results.iter().find(|r| r.agent == AgentName::Critic) {
        steps.extend(
            critic
                .proposed_answer
                .lines()
                .map(str::trim)
                .filter(|l| {
                    l.starts_with("- Recommend")
                        || l.starts_with("- Add")
                        || l.starts_with("- Validate")
                })
                .map(String::from),
        );
    }

    if steps.is_empty() {
        steps.push("- Review the trace output for detailed agent reasoning.".to_string());
    }

    steps.push(TRACE_POINTER.to_string());
    steps
}

/// `1. `-style numbered list line.
fn is_numbered_step(line: &str) -> bool {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && line[digits..].starts_with('.')
}

fn mean_confidence(results: &[AgentResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| r.confidence).sum::<f64>() / results.len() as f64
}

/// Three-part report: Executive Summary, Detailed Breakdown, TL;DR.
fn render_summary(
    context: &str,
    results: &[AgentResult],
    consensus: &[String],
    next_steps: &[String],
) -> String {
    let avg_pct = (mean_confidence(results) * 100.0).round() as i64;
    let overall_mode = if results.iter().all(|r| r.source == Source::Heuristic) {
        "heuristic"
    } else {
        "hybrid"
    };
    let has_security_concern = consensus.iter().any(|c| c.starts_with("SECURITY"));

    let mut parts: Vec<String> = Vec::new();

    // Executive Summary
    parts.push("## Executive Summary".to_string());
    parts.push(String::new());
    let mut exec = format!(
        "Processed by {} agents (avg confidence: {avg_pct}%).",
        results.len()
    );
    if has_security_concern {
        exec.push_str(" A security concern was flagged; review the warning below before acting.");
    }
    parts.push(exec);
    parts.push(String::new());

    // Detailed Breakdown
    parts.push("## Detailed Breakdown".to_string());
    parts.push(String::new());
    parts.push(context.to_string());
    parts.push(format!(
        "Mode: {overall_mode} | agents: {} | avg confidence: {avg_pct}%",
        results.len()
    ));
    if !consensus.is_empty() {
        parts.push(String::new());
        parts.push("Consensus:".to_string());
        for item in consensus {
            parts.push(format!("  * {item}"));
        }
    }
    parts.push(String::new());
    parts.push("Next steps:".to_string());
    for step in next_steps {
        parts.push(format!("  {step}"));
    }
    parts.push(String::new());

    // TL;DR
    parts.push("## TL;DR".to_string());
    parts.push(String::new());
    let highlights: Vec<&str> = consensus
        .iter()
        .filter(|c| !c.starts_with("SECURITY"))
        .take(2)
        .map(String::as_str)
        .collect();
    if highlights.is_empty() {
        parts.push(format!(
            "All agents completed; average confidence {avg_pct}%."
        ));
    } else {
        parts.push(highlights.join(" | "));
    }
    parts.push(String::new());
    parts.push("Full trace: run `lcs trace`.".to_string());

    parts.join("\n")
}

/// Format the full result set as a structured block for the generative pass.
fn build_synthesis_prompt(pkt: &Packet, results: &[AgentResult]) -> String {
    let mut prompt = format!(
        "{}\n\nUser request:\n{}\n\nAgent results:\n",
        context_line(pkt),
        pkt.user_text
    );
    for result in results {
        prompt.push_str(&format!(
            "\n--- {} (confidence: {:.2}, source: {}) ---\nNotes:\n",
            result.agent, result.confidence, result.source
        ));
        for note in &result.notes {
            prompt.push_str(&format!("- {note}\n"));
        }
        prompt.push_str(&format!("Answer:\n{}\n", result.proposed_answer));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_step_detection() {
        assert!(is_numbered_step("1. Define interfaces"));
        assert!(is_numbered_step("42. Later step"));
        assert!(!is_numbered_step("Implementation plan:"));
        assert!(!is_numbered_step(".1 backwards"));
        assert!(!is_numbered_step(""));
    }

    #[test]
    fn mean_confidence_of_empty_set_is_zero() {
        assert_eq!(mean_confidence(&[]), 0.0);
    }
}
