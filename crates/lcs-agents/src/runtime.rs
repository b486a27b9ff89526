//! Agent runtime — fan-out/fan-in over the enabled agents.
//!
//! All enabled agents are dispatched concurrently against the same immutable
//! packet and one shared memory-context snapshot; no agent observes another
//! agent's output. Fan-in preserves the fixed enumeration order (builder,
//! researcher, critic, security), not completion order, so downstream
//! synthesis is reproducible.

use crate::{builder, critic, researcher, security};
use futures::future::try_join_all;
use lcs_core::{AgentName, AgentResult, LcsConfig, MemoryRecord, Packet, Result};
use lcs_llm::Gateway;
use tracing::{debug, info};

/// Records surfaced to agents as context on each run.
pub const MEMORY_CONTEXT_RECORDS: usize = 10;

/// Values longer than this are truncated in the rendered context block.
const MEMORY_VALUE_CHARS: usize = 200;

/// Read access to the persisted memory log. The store behind it is
/// append-only and owned by the caller.
pub trait MemorySource: Send + Sync {
    /// The most recent `limit` records, in chronological order.
    fn recent(&self, limit: usize) -> Vec<MemoryRecord>;
}

/// A memory source with nothing in it.
pub struct NoMemory;

impl MemorySource for NoMemory {
    fn recent(&self, _limit: usize) -> Vec<MemoryRecord> {
        Vec::new()
    }
}

/// Per-agent lifecycle notification. Observability only; outcomes are
/// unaffected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentStatus {
    Running,
    Done,
    Error,
}

#[derive(Clone, Copy, Debug)]
pub struct AgentProgress {
    pub agent: AgentName,
    pub status: AgentStatus,
}

pub type ProgressFn = dyn Fn(AgentProgress) + Send + Sync;

/// Render memory records as a bounded text block for prompts. Records are
/// expected in chronological order. Empty input renders to an empty string.
pub fn format_memory_context(records: &[MemoryRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }
    let mut block = String::from("Recent memory:");
    for rec in records {
        let value: String = if rec.value.chars().count() > MEMORY_VALUE_CHARS {
            let truncated: String = rec.value.chars().take(MEMORY_VALUE_CHARS).collect();
            format!("{truncated}...")
        } else {
            rec.value.clone()
        };
        block.push_str(&format!("\n- [{}] {}: {}", rec.kind, rec.key, value));
    }
    block
}

/// Run all enabled agents concurrently and collect their results.
///
/// Fail-fast: if any agent's invocation errors (only possible for faults
/// outside the agent's own generative-failure handling), the whole call
/// fails and no partial results are returned.
pub async fn run_agents(
    pkt: &Packet,
    config: &LcsConfig,
    gateway: &Gateway,
    memory: &dyn MemorySource,
    on_progress: Option<&ProgressFn>,
) -> Result<Vec<AgentResult>> {
    // One snapshot, shared read-only by every agent in this run.
    let memory_context = format_memory_context(&memory.recent(MEMORY_CONTEXT_RECORDS));

    let enabled: Vec<AgentName> = AgentName::ALL
        .into_iter()
        .filter(|name| config.agent(*name).enabled)
        .collect();
    debug!(run_id = %pkt.run_id, agents = enabled.len(), "dispatching agents");

    let notify = |agent: AgentName, status: AgentStatus| {
        if let Some(callback) = on_progress {
            callback(AgentProgress { agent, status });
        }
    };

    let tasks = enabled.iter().map(|&name| {
        let memory_context = memory_context.as_str();
        let notify = &notify;
        async move {
            notify(name, AgentStatus::Running);
            let result = run_one(name, pkt, config, gateway, memory_context).await;
            match &result {
                Ok(_) => notify(name, AgentStatus::Done),
                Err(_) => notify(name, AgentStatus::Error),
            }
            result
        }
    });

    let results = try_join_all(tasks).await?;
    info!(run_id = %pkt.run_id, results = results.len(), "agents complete");
    Ok(results)
}

async fn run_one(
    name: AgentName,
    pkt: &Packet,
    config: &LcsConfig,
    gateway: &Gateway,
    memory_context: &str,
) -> Result<AgentResult> {
    match name {
        AgentName::Builder => builder::run(pkt, config, gateway, memory_context).await,
        AgentName::Researcher => researcher::run(pkt, config, gateway, memory_context).await,
        AgentName::Critic => critic::run(pkt, config, gateway, memory_context).await,
        AgentName::Security => security::run(pkt, config, gateway, memory_context).await,
    }
}
