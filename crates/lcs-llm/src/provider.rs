//! Provider trait and the gateway that routes completion calls
//!
//! The gateway is the process-wide capability object: built once from config
//! at startup and passed explicitly to everything that needs a model call.
//! Callers must treat every failure uniformly (catch-and-fallback), never
//! branching on the error subtype.

use crate::anthropic::AnthropicClient;
use crate::openai::OpenAiClient;
use crate::types::CompletionRequest;
use lcs_core::{LcsConfig, Provider};
use std::collections::HashMap;
use std::sync::Arc;

/// Result type for provider operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Provider error types
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider unavailable: {provider} (no credential configured)")]
    Unavailable { provider: String },

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Abstract "call model with system+user prompt → text" capability.
#[async_trait::async_trait]
pub trait TextProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Whether a credential is configured. Checked before invocation, but
    /// `complete` must also fail cleanly when called anyway.
    fn is_available(&self) -> bool;

    async fn complete(&self, request: CompletionRequest) -> LlmResult<String>;
}

/// Routes completion calls to the configured providers.
pub struct Gateway {
    providers: HashMap<Provider, Arc<dyn TextProvider>>,
}

impl Gateway {
    /// Build the gateway from config. Providers without a credential are
    /// simply not registered; calls against them fail with `Unavailable`.
    pub fn from_config(config: &LcsConfig) -> Self {
        let mut providers: HashMap<Provider, Arc<dyn TextProvider>> = HashMap::new();

        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            providers.insert(Provider::Anthropic, Arc::new(AnthropicClient::new(key)));
        }
        if let Some(key) = config.openai_api_key.as_deref().filter(|k| !k.is_empty()) {
            providers.insert(Provider::OpenAi, Arc::new(OpenAiClient::new(key)));
        }

        Self { providers }
    }

    /// An empty gateway: every call fails with `Unavailable`.
    pub fn disconnected() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register (or replace) a provider. Used by tests to inject fakes.
    pub fn with_provider(mut self, provider: Provider, client: Arc<dyn TextProvider>) -> Self {
        self.providers.insert(provider, client);
        self
    }

    pub fn is_available(&self, provider: Provider) -> bool {
        self.providers
            .get(&provider)
            .is_some_and(|p| p.is_available())
    }

    /// Dispatch a completion call.
    ///
    /// No timeout is applied here; a hung upstream call blocks its caller.
    pub async fn complete(
        &self,
        provider: Provider,
        request: CompletionRequest,
    ) -> LlmResult<String> {
        let client = self
            .providers
            .get(&provider)
            .ok_or_else(|| LlmError::Unavailable {
                provider: provider.as_str().to_string(),
            })?;
        if !client.is_available() {
            return Err(LlmError::Unavailable {
                provider: provider.as_str().to_string(),
            });
        }
        client.complete(request).await
    }
}
