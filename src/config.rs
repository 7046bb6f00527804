use std::env;

use locator_assist::AssistSettings;
use locator_core::{ClassMatch, LocatorOptions};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::snippet::Framework;

pub const HF_TOKEN_ENV: &str = "XPATH_FORGE_HF_TOKEN";
pub const OPENROUTER_KEY_ENV: &str = "XPATH_FORGE_OPENROUTER_KEY";
pub const CLASS_MATCH_ENV: &str = "XPATH_FORGE_CLASS_MATCH";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub locator: LocatorOptions,
    #[serde(default)]
    pub assist: AssistSettings,
    #[serde(default)]
    pub snippet: SnippetConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SnippetConfig {
    #[serde(default = "default_framework")]
    pub default_framework: Framework,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            default_framework: default_framework(),
        }
    }
}

fn default_framework() -> Framework {
    Framework::Cypress
}

impl Config {
    /// Applies credentials and switches from the environment on top of the file values.
    pub fn apply_env_overrides(&mut self) {
        if let Some(token) = non_empty_var(HF_TOKEN_ENV) {
            self.assist.huggingface.token = Some(token);
            info!("Using Hugging Face token from {}", HF_TOKEN_ENV);
        }
        if let Some(key) = non_empty_var(OPENROUTER_KEY_ENV) {
            self.assist.openrouter.api_key = Some(key);
            info!("Using OpenRouter key from {}", OPENROUTER_KEY_ENV);
        }
        if let Some(raw) = non_empty_var(CLASS_MATCH_ENV) {
            match raw.parse::<ClassMatch>() {
                Ok(class_match) => self.locator.class_match = class_match,
                Err(err) => warn!(value = %raw, %err, "ignoring {}", CLASS_MATCH_ENV),
            }
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_sections_are_optional() {
        let config: Config = serde_yaml::from_str("locator:\n  class_match: token\n").expect("config");
        assert_eq!(config.locator.class_match, ClassMatch::Token);
        assert!(config.assist.enabled);
        assert_eq!(config.snippet.default_framework, Framework::Cypress);

        let empty: Config = serde_yaml::from_str("{}").expect("empty");
        assert_eq!(empty.locator.class_match, ClassMatch::Exact);
    }

    #[test]
    fn assist_section_round_trips_through_yaml() {
        let raw = "assist:\n  timeout_ms: 2500\n  order: [openrouter, huggingface]\nsnippet:\n  default_framework: playwright\n";
        let config: Config = serde_yaml::from_str(raw).expect("config");
        assert_eq!(config.assist.timeout_ms, 2500);
        assert_eq!(config.snippet.default_framework, Framework::Playwright);
        let back = serde_yaml::to_string(&config).expect("yaml");
        assert!(back.contains("timeout_ms: 2500"));
    }
}
