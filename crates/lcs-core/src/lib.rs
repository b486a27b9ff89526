//! LCS Core - Types, configuration, errors, and the packet router

pub mod config;
pub mod error;
pub mod router;
pub mod types;

pub use config::{AgentSettings, LcsConfig, Provider, SynthesisSettings};
pub use error::{Error, Result};
pub use router::route;
pub use types::*;
