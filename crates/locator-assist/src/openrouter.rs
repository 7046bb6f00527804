use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element_info::ElementInfo;
use crate::errors::AssistError;
use crate::prompt::chat_prompt;
use crate::provider::LocatorProvider;
use crate::settings::OpenRouterConfig;

const NAME: &str = "openrouter";

/// OpenAI-compatible chat completions; the first choice's content is the suggestion.
pub struct OpenRouterProvider {
    client: Client,
    config: OpenRouterConfig,
    api_key: String,
}

impl OpenRouterProvider {
    pub fn new(config: OpenRouterConfig, timeout: Duration) -> Result<Self, AssistError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AssistError::NotConfigured("missing OpenRouter API key".to_string()))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| AssistError::Http {
                provider: NAME.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl LocatorProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn suggest(&self, info: &ElementInfo) -> Result<String, AssistError> {
        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );
        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: chat_prompt(info),
            }],
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|source| AssistError::Http {
                provider: NAME.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            return Err(AssistError::Status {
                provider: NAME.to_string(),
                status,
                body: text,
            });
        }

        let response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| AssistError::invalid_response(NAME, err.to_string()))?;
        let content = first_choice_content(response)?;
        debug!(provider = NAME, model = %self.config.model, "completion received");
        Ok(content)
    }
}

fn first_choice_content(response: ChatCompletionResponse) -> Result<String, AssistError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AssistError::invalid_response(NAME, "response missing content"))?;
    let content = content.trim();
    if content.is_empty() {
        return Err(AssistError::EmptySuggestion {
            provider: NAME.to_string(),
        });
    }
    Ok(content.to_string())
}
