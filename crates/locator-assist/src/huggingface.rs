use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::element_info::ElementInfo;
use crate::errors::AssistError;
use crate::prompt::completion_prompt;
use crate::provider::LocatorProvider;
use crate::settings::HuggingFaceConfig;

const NAME: &str = "huggingface";

/// Text-generation inference endpoint. The reply echoes the prompt, which is
/// removed before the first remaining line is returned.
pub struct HuggingFaceProvider {
    client: Client,
    config: HuggingFaceConfig,
}

impl HuggingFaceProvider {
    pub fn new(config: HuggingFaceConfig, timeout: Duration) -> Result<Self, AssistError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| AssistError::Http {
                provider: NAME.to_string(),
                source,
            })?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationParameters {
    max_length: u32,
    temperature: f32,
}

#[async_trait]
impl LocatorProvider for HuggingFaceProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn suggest(&self, info: &ElementInfo) -> Result<String, AssistError> {
        let prompt = completion_prompt(info);
        let body = GenerationRequest {
            inputs: &prompt,
            parameters: GenerationParameters {
                max_length: self.config.max_length,
                temperature: self.config.temperature,
            },
        };

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(token) = self.config.token.as_deref().filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|source| AssistError::Http {
            provider: NAME.to_string(),
            source,
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            return Err(AssistError::Status {
                provider: NAME.to_string(),
                status,
                body,
            });
        }

        let payload: JsonValue = response
            .json()
            .await
            .map_err(|err| AssistError::invalid_response(NAME, err.to_string()))?;
        let generated = generated_text(&payload)?;
        debug!(provider = NAME, chars = generated.len(), "generation received");
        first_line_after_prompt(&generated, &prompt).ok_or_else(|| AssistError::EmptySuggestion {
            provider: NAME.to_string(),
        })
    }
}

/// Accepts both `{"generated_text": ..}` and `[{"generated_text": ..}]`.
fn generated_text(payload: &JsonValue) -> Result<String, AssistError> {
    if let Some(error) = payload.get("error").and_then(JsonValue::as_str) {
        return Err(AssistError::invalid_response(NAME, error));
    }
    payload
        .get("generated_text")
        .or_else(|| payload.get(0).and_then(|first| first.get("generated_text")))
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| AssistError::invalid_response(NAME, "missing generated_text"))
}

fn first_line_after_prompt(generated: &str, prompt: &str) -> Option<String> {
    let stripped = generated.replace(prompt, "");
    let line = stripped.trim().lines().next()?.trim();
    (!line.is_empty()).then(|| line.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_object_and_array_payloads() {
        assert_eq!(
            generated_text(&json!({"generated_text": "x"})).expect("object"),
            "x"
        );
        assert_eq!(
            generated_text(&json!([{"generated_text": "y"}])).expect("array"),
            "y"
        );
        assert!(generated_text(&json!({"error": "Model is loading"})).is_err());
        assert!(generated_text(&json!({})).is_err());
    }

    #[test]
    fn strips_prompt_echo() {
        let prompt = "Tag: a\nXPath:";
        let generated = format!("{prompt} //a[@id='home']\nexplanation follows");
        assert_eq!(
            first_line_after_prompt(&generated, prompt).as_deref(),
            Some("//a[@id='home']")
        );
        assert_eq!(first_line_after_prompt(prompt, prompt), None);
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let provider = HuggingFaceProvider::new(
            HuggingFaceConfig {
                api_base: "http://localhost:9000/".into(),
                ..HuggingFaceConfig::default()
            },
            Duration::from_secs(1),
        )
        .expect("client");
        assert_eq!(
            provider.endpoint(),
            "http://localhost:9000/models/microsoft/DialoGPT-medium"
        );
    }
}
