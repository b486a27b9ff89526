//! LCS config — serde structs for `.lcs/config.json`.
//!
//! Precedence is explicit and field-by-field: built-in defaults, then the
//! config file overlay (partial, all fields optional), then environment
//! variables for API keys the file left unset.

use crate::error::{Error, Result};
use crate::types::AgentName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5-20250929";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

const LCS_DIR: &str = ".lcs";
const CONFIG_FILE: &str = "config.json";

/// Generative text provider.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Anthropic,
    OpenAi,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-agent settings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSettings {
    pub enabled: bool,
    pub temperature: f32,
    pub provider: Provider,
}

/// Settings for the kernel synthesizer's generative pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisSettings {
    pub model: String,
    pub temperature: f32,
    pub provider: Provider,
}

/// Resolved process configuration. Constructed once at startup.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LcsConfig {
    /// Default Anthropic model id.
    pub model: String,
    /// Default OpenAI model id.
    pub openai_model: String,
    pub api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub agents: BTreeMap<AgentName, AgentSettings>,
    pub synthesis: SynthesisSettings,
}

impl Default for LcsConfig {
    fn default() -> Self {
        let mut agents = BTreeMap::new();
        agents.insert(AgentName::Builder, AgentSettings { enabled: true, temperature: 0.3, provider: Provider::Anthropic });
        agents.insert(AgentName::Researcher, AgentSettings { enabled: true, temperature: 0.5, provider: Provider::Anthropic });
        agents.insert(AgentName::Critic, AgentSettings { enabled: true, temperature: 0.3, provider: Provider::Anthropic });
        agents.insert(AgentName::Security, AgentSettings { enabled: true, temperature: 0.1, provider: Provider::Anthropic });

        Self {
            model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            api_key: None,
            openai_api_key: None,
            agents,
            synthesis: SynthesisSettings {
                model: DEFAULT_ANTHROPIC_MODEL.to_string(),
                temperature: 0.2,
                provider: Provider::Anthropic,
            },
        }
    }
}

/// Partial config file overlay. Every field is optional so a file can
/// override a single knob without restating the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FileConfig {
    model: Option<String>,
    openai_model: Option<String>,
    api_key: Option<String>,
    openai_api_key: Option<String>,
    agents: BTreeMap<AgentName, FileAgentSettings>,
    synthesis: Option<FileSynthesisSettings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FileAgentSettings {
    enabled: Option<bool>,
    temperature: Option<f32>,
    provider: Option<Provider>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FileSynthesisSettings {
    model: Option<String>,
    temperature: Option<f32>,
    provider: Option<Provider>,
}

impl LcsConfig {
    /// Load config rooted at `base` (the directory holding `.lcs/`).
    ///
    /// A missing file yields the defaults; a malformed file is an error
    /// rather than a silent fallback.
    pub fn load(base: &Path) -> Result<Self> {
        let mut config = Self::default();

        let path = config_path(base);
        if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let overlay: FileConfig = serde_json::from_str(&raw)
                .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;
            config.apply_overlay(overlay);
        }

        // Env fills keys only when the file left them unset.
        if config.api_key.is_none() {
            config.api_key = non_empty_env("ANTHROPIC_API_KEY");
        }
        if config.openai_api_key.is_none() {
            config.openai_api_key = non_empty_env("OPENAI_API_KEY");
        }

        Ok(config)
    }

    fn apply_overlay(&mut self, overlay: FileConfig) {
        if let Some(model) = overlay.model {
            self.model = model;
        }
        if let Some(model) = overlay.openai_model {
            self.openai_model = model;
        }
        if overlay.api_key.is_some() {
            self.api_key = overlay.api_key;
        }
        if overlay.openai_api_key.is_some() {
            self.openai_api_key = overlay.openai_api_key;
        }
        for (name, partial) in overlay.agents {
            let settings = self.agents.entry(name).or_insert(AgentSettings {
                enabled: true,
                temperature: 0.3,
                provider: Provider::Anthropic,
            });
            if let Some(enabled) = partial.enabled {
                settings.enabled = enabled;
            }
            if let Some(temperature) = partial.temperature {
                settings.temperature = temperature;
            }
            if let Some(provider) = partial.provider {
                settings.provider = provider;
            }
        }
        if let Some(synthesis) = overlay.synthesis {
            if let Some(model) = synthesis.model {
                self.synthesis.model = model;
            }
            if let Some(temperature) = synthesis.temperature {
                self.synthesis.temperature = temperature;
            }
            if let Some(provider) = synthesis.provider {
                self.synthesis.provider = provider;
            }
        }
    }

    /// Settings for one agent. Agents absent from the map run with defaults.
    pub fn agent(&self, name: AgentName) -> AgentSettings {
        self.agents.get(&name).copied().unwrap_or(AgentSettings {
            enabled: true,
            temperature: 0.3,
            provider: Provider::Anthropic,
        })
    }

    /// Default model id for a provider.
    pub fn model_for(&self, provider: Provider) -> &str {
        match provider {
            Provider::Anthropic => &self.model,
            Provider::OpenAi => &self.openai_model,
        }
    }

    /// A provider is available iff its credential is configured.
    pub fn is_provider_available(&self, provider: Provider) -> bool {
        let key = match provider {
            Provider::Anthropic => &self.api_key,
            Provider::OpenAi => &self.openai_api_key,
        };
        key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// True when any configured agent can reach its provider.
    pub fn any_provider_available(&self) -> bool {
        self.is_provider_available(Provider::Anthropic)
            || self.is_provider_available(Provider::OpenAi)
    }
}

/// Write the default config file under `base`, refusing to clobber one
/// that already exists. Returns a human-readable status line.
pub fn init_config(base: &Path) -> Result<String> {
    let dir = base.join(LCS_DIR);
    std::fs::create_dir_all(&dir)?;

    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        return Ok(format!("Config already exists at {}", path.display()));
    }

    let default = LcsConfig::default();
    let json = serde_json::to_string_pretty(&default)?;
    std::fs::write(&path, json + "\n")?;
    Ok(format!(
        "Config created at {}\nSet your API key: ANTHROPIC_API_KEY env var or edit config.json",
        path.display()
    ))
}

/// Path of the config file under `base`.
pub fn config_path(base: &Path) -> PathBuf {
    base.join(LCS_DIR).join(CONFIG_FILE)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
