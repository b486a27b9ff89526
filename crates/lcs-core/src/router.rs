//! Packet router — classifies raw text into a routed [`Packet`].
//!
//! Routing is total and pure: for a given input text the classification is
//! always the same (only `run_id`/`ts` differ between calls). Matching is
//! substring-based on the lowercased text, deliberately un-tokenized — a
//! keyword embedded in a longer word still matches ("adding" hits "add").

use crate::types::{Domain, Intent, Mode, Packet, Risk};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

/// Intent lexicons, tested in this priority order. First set with any
/// substring hit wins; no hit falls back to `Intent::General`.
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Build,
        &["build", "implement", "create", "code", "write", "scaffold", "make", "add"],
    ),
    (
        Intent::Design,
        &["design", "architect", "plan", "structure", "layout", "model"],
    ),
    (
        Intent::Research,
        &["research", "find", "search", "learn", "explain", "compare", "review"],
    ),
];

const DOMAIN_KEYWORDS: &[&str] = &[
    "ai", "llm", "agent", "model", "neural", "transformer", "lcs", "kernel", "synthesis",
];

const DANGER_SIGNALS: &[&str] = &[
    "exec", "eval", "shell", "sudo", "rm ", "delete", "drop", "inject",
];

/// Input longer than this (in chars) is at least medium risk.
const LONG_INPUT_CHARS: usize = 500;

fn classify_intent(lower: &str) -> Intent {
    for (intent, keywords) in INTENT_KEYWORDS {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return *intent;
        }
    }
    Intent::General
}

fn classify_domain(lower: &str) -> Domain {
    if DOMAIN_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        Domain::AiArchitecture
    } else {
        Domain::General
    }
}

fn assess_risk(lower: &str) -> Risk {
    // Danger check takes priority over the length check.
    if DANGER_SIGNALS.iter().any(|s| lower.contains(s)) {
        return Risk::High;
    }
    if lower.chars().count() > LONG_INPUT_CHARS {
        return Risk::Medium;
    }
    Risk::Low
}

fn choose_mode(intent: Intent) -> Mode {
    match intent {
        Intent::Design | Intent::Research => Mode::HighEntropy,
        _ => Mode::LowEntropy,
    }
}

/// Route raw text into a fully populated packet. Never fails.
pub fn route(user_text: &str) -> Packet {
    let lower = user_text.to_lowercase();

    let intent = classify_intent(&lower);
    let domain = classify_domain(&lower);
    let risk = assess_risk(&lower);
    let mode = choose_mode(intent);

    let mut constraints = Vec::new();
    if risk == Risk::High {
        constraints.push("elevated-risk: extra scrutiny required".to_string());
    }
    if mode == Mode::HighEntropy {
        constraints.push("creative-mode: broader exploration".to_string());
    }

    let tasks = vec![
        format!("Analyze user request with intent={intent}"),
        format!("Apply {domain} domain knowledge"),
        format!("Synthesize under {mode} mode"),
    ];

    debug!(%intent, %domain, %risk, %mode, "routed packet");

    Packet {
        run_id: Uuid::new_v4().to_string(),
        ts: Utc::now(),
        user_text: user_text.to_string(),
        intent,
        domain,
        mode,
        risk,
        constraints,
        tasks,
    }
}
