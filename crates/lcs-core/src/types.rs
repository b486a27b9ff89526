//! Core types for LCS: the routed packet, agent results, synthesis output,
//! and the persisted trace/memory records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classified intent of a user request.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Build,
    Design,
    Research,
    General,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Build => write!(f, "build"),
            Self::Design => write!(f, "design"),
            Self::Research => write!(f, "research"),
            Self::General => write!(f, "general"),
        }
    }
}

/// Knowledge domain of a request.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    AiArchitecture,
    General,
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AiArchitecture => write!(f, "ai_architecture"),
            Self::General => write!(f, "general"),
        }
    }
}

/// Assessed risk level of a request.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Risk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Processing mode. High entropy widens exploration for design/research work.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    LowEntropy,
    HighEntropy,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LowEntropy => write!(f, "low_entropy"),
            Self::HighEntropy => write!(f, "high_entropy"),
        }
    }
}

/// Identity of one of the four fixed agents.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AgentName {
    Builder,
    Researcher,
    Critic,
    Security,
}

impl AgentName {
    /// All agents in their fixed enumeration (and fan-in) order.
    pub const ALL: [AgentName; 4] = [
        AgentName::Builder,
        AgentName::Researcher,
        AgentName::Critic,
        AgentName::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Builder => "builder",
            Self::Researcher => "researcher",
            Self::Critic => "critic",
            Self::Security => "security",
        }
    }
}

impl std::fmt::Display for AgentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provenance of an agent result or the synthesis output.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Heuristic,
    Generated,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Heuristic => write!(f, "heuristic"),
            Self::Generated => write!(f, "generated"),
        }
    }
}

/// A routed request packet. Immutable once created: apart from `run_id` and
/// `ts`, every field is a pure function of `user_text`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Packet {
    pub run_id: String,
    pub ts: DateTime<Utc>,
    pub user_text: String,
    pub intent: Intent,
    pub domain: Domain,
    pub mode: Mode,
    pub risk: Risk,
    pub constraints: Vec<String>,
    pub tasks: Vec<String>,
}

/// One agent's opinion on a packet. Never mutated after return.
///
/// `confidence` values are agent-specific and only comparable through the
/// synthesizer's fixed threshold, not against each other in absolute terms.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentResult {
    pub agent: AgentName,
    /// Short observations. When `source` is generated, the first note
    /// carries provenance in `provider:model` form.
    pub notes: Vec<String>,
    pub proposed_answer: String,
    /// In [0, 1].
    pub confidence: f64,
    pub source: Source,
}

/// The merged report produced from a full result set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynthesisOutput {
    pub context: String,
    pub consensus: Vec<String>,
    pub next_steps: Vec<String>,
    pub summary: String,
    pub source: Source,
}

/// Persisted record of one full run. Append-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TraceRecord {
    pub pkt: Packet,
    pub results: Vec<AgentResult>,
    pub out: SynthesisOutput,
    pub ts: DateTime<Utc>,
}

/// Free-form persisted note, surfaced to agents as memory context.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemoryRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub key: String,
    pub value: String,
    pub ts: DateTime<Utc>,
}

impl MemoryRecord {
    pub fn new(kind: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            key: key.into(),
            value: value.into(),
            ts: Utc::now(),
        }
    }
}
