//! Generative enhancement shared by all four agents.
//!
//! Try-generative-else-heuristic is modeled as an explicit two-branch
//! attempt: [`attempt`] always resolves to a tagged [`Attempt`], and
//! [`resolve`] folds it onto the heuristic base result. There is no path
//! that leaves a failure unhandled or escapes to the caller.

use lcs_core::{AgentResult, Packet, Provider, Source};
use lcs_llm::{CompletionRequest, Gateway};
use tracing::warn;

/// Outcome of one generative attempt.
pub(crate) enum Attempt {
    /// Provider unavailable; not an error, the heuristic result stands.
    Skipped,
    Generated(String),
    Failed(String),
}

/// Per-agent parameters of the generative path.
pub(crate) struct GenerativeSpec<'a> {
    pub system: &'a str,
    pub provider: Provider,
    pub model: &'a str,
    pub temperature: f32,
    /// Fixed confidence reported on the generative path; never recomputed
    /// from the returned content.
    pub confidence: f64,
}

impl GenerativeSpec<'_> {
    /// Provenance tag in `provider:model` form.
    pub(crate) fn provenance(&self) -> String {
        format!("{}:{}", self.provider, self.model)
    }
}

/// Run one generative attempt. Availability is checked first to avoid a
/// needless failure round-trip; an unavailable provider is a skip, not a
/// failure.
pub(crate) async fn attempt(
    gateway: &Gateway,
    spec: &GenerativeSpec<'_>,
    pkt: &Packet,
    memory_context: &str,
) -> Attempt {
    if !gateway.is_available(spec.provider) {
        return Attempt::Skipped;
    }

    let request = CompletionRequest::new(
        spec.system,
        build_user_prompt(pkt, memory_context),
        spec.model,
        spec.temperature,
    );

    match gateway.complete(spec.provider, request).await {
        Ok(text) => Attempt::Generated(text),
        Err(e) => Attempt::Failed(e.to_string()),
    }
}

/// Fold an attempt onto the heuristic base result.
///
/// Success replaces the answer and retags the result; failure keeps the
/// heuristic output and inserts an explanatory note at position 0.
pub(crate) fn resolve(
    mut base: AgentResult,
    attempt: Attempt,
    spec: &GenerativeSpec<'_>,
) -> AgentResult {
    match attempt {
        Attempt::Skipped => base,
        Attempt::Generated(text) => {
            base.notes.insert(0, spec.provenance());
            base.proposed_answer = text;
            base.confidence = spec.confidence;
            base.source = Source::Generated;
            base
        }
        Attempt::Failed(reason) => {
            warn!(agent = %base.agent, provider = %spec.provider, %reason, "generative call failed, using heuristic output");
            base.notes.insert(0, degradation_note(spec.provider, &reason));
            base
        }
    }
}

pub(crate) fn degradation_note(provider: Provider, reason: &str) -> String {
    format!("generative call to {provider} failed ({reason}); heuristic result returned")
}

/// Templated user prompt: packet fields, memory context, raw request.
pub(crate) fn build_user_prompt(pkt: &Packet, memory_context: &str) -> String {
    let mut prompt = format!(
        "Routed LCS packet:\n\
         - intent: {}\n\
         - domain: {}\n\
         - mode: {}\n\
         - risk: {}\n",
        pkt.intent, pkt.domain, pkt.mode, pkt.risk
    );
    if !pkt.constraints.is_empty() {
        prompt.push_str(&format!("- constraints: {}\n", pkt.constraints.join("; ")));
    }
    if !pkt.tasks.is_empty() {
        prompt.push_str(&format!("- tasks: {}\n", pkt.tasks.join("; ")));
    }
    if !memory_context.is_empty() {
        prompt.push_str(&format!("\n{memory_context}\n"));
    }
    prompt.push_str(&format!("\nUser request:\n{}", pkt.user_text));
    prompt
}
