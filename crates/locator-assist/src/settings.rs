use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    HuggingFace,
    OpenRouter,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProviderKind::HuggingFace => "huggingface",
            ProviderKind::OpenRouter => "openrouter",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HuggingFaceConfig {
    pub api_base: String,
    pub model: String,
    /// Inference API token; anonymous requests are allowed but rate limited.
    pub token: Option<String>,
    pub max_length: u32,
    pub temperature: f32,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api-inference.huggingface.co".to_string(),
            model: "microsoft/DialoGPT-medium".to_string(),
            token: None,
            max_length: 100,
            temperature: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterConfig {
    pub api_base: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_base: "https://openrouter.ai/api/v1".to_string(),
            model: "openchat/openchat-7b:free".to_string(),
            api_key: None,
            max_tokens: 50,
        }
    }
}

/// The `assist` configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistSettings {
    pub enabled: bool,
    /// Per-provider timeout
    pub timeout_ms: u64,
    pub order: Vec<ProviderKind>,
    pub huggingface: HuggingFaceConfig,
    pub openrouter: OpenRouterConfig,
}

impl Default for AssistSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 8_000,
            order: vec![ProviderKind::HuggingFace, ProviderKind::OpenRouter],
            huggingface: HuggingFaceConfig::default(),
            openrouter: OpenRouterConfig::default(),
        }
    }
}

impl AssistSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_sections_fill_defaults() {
        let settings: AssistSettings = serde_json::from_str(
            r#"{"timeout_ms": 1500, "order": ["openrouter"], "openrouter": {"api_key": "k"}}"#,
        )
        .expect("settings");
        assert!(settings.enabled);
        assert_eq!(settings.timeout(), Duration::from_millis(1500));
        assert_eq!(settings.order, vec![ProviderKind::OpenRouter]);
        assert_eq!(settings.openrouter.api_key.as_deref(), Some("k"));
        assert_eq!(settings.openrouter.max_tokens, 50);
        assert_eq!(settings.huggingface.model, "microsoft/DialoGPT-medium");
    }
}
