//! LCS LLM - Provider adapters behind one abstract completion call

pub mod anthropic;
pub mod openai;
pub mod provider;
pub mod types;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;
pub use provider::{Gateway, LlmError, LlmResult, TextProvider};
pub use types::CompletionRequest;
