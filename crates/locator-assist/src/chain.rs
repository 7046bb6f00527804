use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::element_info::ElementInfo;
use crate::errors::AssistError;
use crate::huggingface::HuggingFaceProvider;
use crate::openrouter::OpenRouterProvider;
use crate::provider::LocatorProvider;
use crate::settings::{AssistSettings, ProviderKind};
use crate::utils::clean_expression;

/// Providers tried in order until one returns a suggestion.
#[derive(Clone)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn LocatorProvider>>,
    timeout: Duration,
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn LocatorProvider>>, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    /// Builds the configured providers in `settings.order`. Providers that
    /// lack credentials are skipped with a warning.
    pub fn from_settings(settings: &AssistSettings) -> Result<Self, AssistError> {
        if !settings.enabled {
            return Err(AssistError::NotConfigured("assist is disabled".to_string()));
        }

        let timeout = settings.timeout();
        let mut providers: Vec<Arc<dyn LocatorProvider>> = Vec::new();
        for kind in &settings.order {
            let built: Result<Arc<dyn LocatorProvider>, AssistError> = match kind {
                ProviderKind::HuggingFace => {
                    HuggingFaceProvider::new(settings.huggingface.clone(), timeout)
                        .map(|p| Arc::new(p) as Arc<dyn LocatorProvider>)
                }
                ProviderKind::OpenRouter => {
                    OpenRouterProvider::new(settings.openrouter.clone(), timeout)
                        .map(|p| Arc::new(p) as Arc<dyn LocatorProvider>)
                }
            };
            match built {
                Ok(provider) => providers.push(provider),
                Err(err) => warn!(provider = %kind, error = %err, "skipping provider"),
            }
        }

        if providers.is_empty() {
            return Err(AssistError::NotConfigured(
                "no provider could be configured".to_string(),
            ));
        }
        Ok(Self::new(providers, timeout))
    }

    pub fn providers(&self) -> &[Arc<dyn LocatorProvider>] {
        &self.providers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Asks each provider in turn and returns the first non-empty cleaned
    /// suggestion. Transport errors, bad statuses, empty replies and timeouts
    /// move on to the next provider; validating the suggestion is left to the
    /// caller.
    pub async fn run(&self, info: &ElementInfo) -> Result<Suggestion, AssistError> {
        let mut failures = Vec::new();

        for provider in &self.providers {
            let name = provider.name().to_string();
            debug!(provider = %name, "requesting suggestion");

            let reply = match tokio::time::timeout(self.timeout, provider.suggest(info)).await {
                Ok(reply) => reply,
                Err(_) => Err(AssistError::Timeout {
                    provider: name.clone(),
                    timeout_ms: self.timeout.as_millis() as u64,
                }),
            };
            let suggestion = reply.and_then(|raw| {
                clean_expression(&raw).ok_or_else(|| AssistError::EmptySuggestion {
                    provider: name.clone(),
                })
            });

            match suggestion {
                Ok(expression) => {
                    info!(provider = %name, expression = expression.as_str(), "suggestion received");
                    return Ok(Suggestion {
                        provider: name,
                        expression,
                    });
                }
                Err(err) => {
                    warn!(provider = %name, error = %err, transient = err.is_transient(), "provider failed");
                    failures.push(err.to_string());
                }
            }
        }

        Err(AssistError::ChainExhausted { failures })
    }
}

/// A cleaned expression and the provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub provider: String,
    pub expression: String,
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("ProviderChain")
            .field("providers", &names)
            .field("timeout", &self.timeout)
            .finish()
    }
}
