//! Request shape for the abstract completion call

/// One system+user completion request. Providers treat the returned text as
/// opaque; no tool use, no streaming.
#[derive(Clone, Debug)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub model: String,
    pub temperature: f32,
    /// Defaults to 1024 at the provider adapters when unset.
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            model: model.into(),
            temperature,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

pub(crate) const DEFAULT_MAX_TOKENS: u32 = 1024;
