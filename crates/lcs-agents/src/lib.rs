//! LCS Agents - the four analyzers, the fan-out/fan-in runtime, and the
//! kernel synthesizer

pub mod builder;
pub mod critic;
mod enhance;
pub mod prompts;
pub mod researcher;
pub mod runtime;
pub mod security;
pub mod synthesize;

pub use runtime::{
    format_memory_context, run_agents, AgentProgress, AgentStatus, MemorySource, NoMemory,
};
pub use synthesize::{synthesize, synthesize_heuristic};
