use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use crate::config::ModelSettings;
use crate::constants::quiz_prompts::SYSTEM_PROMPT;
use crate::errors::{AppError, AppResult};

/// A generative model that answers a single instruction with free-form text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> AppResult<String>;
}

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiQuizModel {
    client: Client<OpenAIConfig>,
    model: String,
    has_api_key: bool,
}

impl OpenAiQuizModel {
    pub fn new(settings: &ModelSettings) -> Self {
        let api_key = settings.api_key.expose_secret();
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&settings.api_base);

        Self {
            client: Client::with_config(config),
            model: settings.model.clone(),
            has_api_key: !api_key.is_empty(),
        }
    }
}

fn chat_request(model: &str, prompt: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": prompt }
        ],
        "temperature": 0.7
    })
}

fn reply_text(response: &Value) -> AppResult<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::MalformedResponse("model reply has no message content".to_string()))
}

#[async_trait]
impl QuizModel for OpenAiQuizModel {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        if !self.has_api_key {
            return Err(AppError::ModelError(
                "no model API key is configured".to_string(),
            ));
        }

        log::debug!("Sending {} character prompt to {}", prompt.len(), self.model);
        let response: Value = self
            .client
            .chat()
            .create_byot(chat_request(&self.model, prompt))
            .await
            .map_err(|e| AppError::ModelError(e.to_string()))?;

        reply_text(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::time::Duration;

    #[test]
    fn test_chat_request_shape() {
        let request = chat_request("gpt-test", "make a quiz");

        assert_eq!(request["model"], "gpt-test");
        assert_eq!(request["messages"][0]["role"], "system");
        assert_eq!(request["messages"][1]["content"], "make a quiz");
    }

    #[test]
    fn test_reply_text_reads_first_choice() {
        let response = json!({
            "choices": [{ "message": { "role": "assistant", "content": "[{}]" } }]
        });
        assert_eq!(reply_text(&response).unwrap(), "[{}]");
    }

    #[test]
    fn test_reply_without_content_is_malformed() {
        let response = json!({ "choices": [] });
        assert!(matches!(
            reply_text(&response),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_a_request() {
        let model = OpenAiQuizModel::new(&ModelSettings {
            api_key: SecretString::from(String::new()),
            api_base: "http://127.0.0.1:1/v1".to_string(),
            model: "gpt-test".to_string(),
            timeout: Duration::from_secs(1),
        });

        assert!(matches!(
            model.complete("prompt").await,
            Err(AppError::ModelError(_))
        ));
    }
}
