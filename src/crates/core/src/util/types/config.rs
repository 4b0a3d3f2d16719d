//! Assistant settings and provider selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Runtime tag selecting which AI backend handles a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    DeepSeek,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::DeepSeek => "deepseek",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::DeepSeek => "DeepSeek",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::DeepSeek => "deepseek-chat",
        }
    }

    /// Whether the backend accepts a native function-calling tool schema.
    /// Backends without tool support receive the textual protocol instead.
    pub fn supports_tool_calls(&self) -> bool {
        matches!(self, ProviderKind::OpenAi)
    }

    pub fn all() -> &'static [ProviderKind] {
        &[ProviderKind::OpenAi, ProviderKind::Gemini, ProviderKind::DeepSeek]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            "deepseek" => Ok(ProviderKind::DeepSeek),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

/// Per-request assistant configuration. Read from the settings store at the
/// start of every turn and threaded explicitly into the adapter layer; there
/// is no ambient global configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSettings {
    pub api_key: String,
    pub provider: ProviderKind,
    pub model: String,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        let provider = ProviderKind::OpenAi;
        Self {
            api_key: String::new(),
            provider,
            model: provider.default_model().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_round_trips_through_str() {
        for kind in ProviderKind::all() {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!("copilot".parse::<ProviderKind>().is_err());
    }
}
