use std::time::Duration;

use async_trait::async_trait;
use biograph_core::config::LlmConfig;
use biograph_core::{Speaker, Turn};
use serde_json::json;

use super::{LanguageModel, LlmError};

/// Chat-completions client for DeepSeek and other OpenAI-compatible APIs.
pub struct OpenAiCompatibleModel {
    config: LlmConfig,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenAiCompatibleModel {
    /// Build from config, reading the key from `config.api_key_env`.
    ///
    /// A missing key is not an error here; calls fail with
    /// [`LlmError::MissingCredential`] instead.
    pub fn from_config(config: LlmConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!(env = %config.api_key_env, "Language model API key not set");
        }
        Self::new(config, api_key)
    }

    pub fn new(config: LlmConfig, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });
        Self {
            config,
            api_key,
            client,
        }
    }

    fn role(speaker: Speaker) -> &'static str {
        match speaker {
            Speaker::Human => "user",
            Speaker::System => "system",
            Speaker::Assistant => "assistant",
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatibleModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    fn check_configured(&self) -> Result<(), LlmError> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(LlmError::MissingCredential(self.config.api_key_env.clone())),
        }
    }

    async fn complete(&self, messages: &[Turn]) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::MissingCredential(self.config.api_key_env.clone()))?;

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let api_messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|turn| {
                json!({
                    "role": Self::role(turn.speaker),
                    "content": turn.text,
                })
            })
            .collect();

        let payload = json!({
            "model": self.config.model,
            "messages": api_messages,
            "temperature": self.config.temperature,
            "stream": false,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 | 403 => LlmError::Authentication(text),
                429 => LlmError::RateLimited,
                code => LlmError::InvalidRequest(format!("HTTP {}: {}", code, text)),
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = data
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| LlmError::Parse("no message content in response".to_string()))?;

        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            reply_chars = content.chars().count(),
            "Language model replied"
        );

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> LlmConfig {
        LlmConfig {
            base_url: server.uri(),
            timeout_secs: 5,
            ..LlmConfig::default()
        }
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "id": "cmpl-1",
            "object": "chat.completion",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
            ]
        })
    }

    #[test]
    fn test_missing_key_not_configured() {
        let model = OpenAiCompatibleModel::new(LlmConfig::default(), None);
        assert_eq!(
            model.check_configured(),
            Err(LlmError::MissingCredential("DEEPSEEK_API_KEY".to_string()))
        );
        assert_eq!(model.name(), "deepseek-chat");
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
            .expect(0)
            .mount(&server)
            .await;

        let model = OpenAiCompatibleModel::new(config_for(&server), None);
        let result = model.complete(&[Turn::human("hi")]).await;
        assert!(matches!(result, Err(LlmError::MissingCredential(_))));
    }

    #[tokio::test]
    async fn test_request_shape_and_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(bearer_token("sk-test"))
            .and(body_partial_json(json!({
                "model": "deepseek-chat",
                "stream": false,
                "messages": [
                    { "role": "system", "content": "rules" },
                    { "role": "user", "content": "Where was Alice born?" },
                    { "role": "assistant", "content": "Lyon" },
                    { "role": "user", "content": "When?" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("In 1990.")))
            .expect(1)
            .mount(&server)
            .await;

        let model = OpenAiCompatibleModel::new(config_for(&server), Some("sk-test".to_string()));
        let reply = model
            .complete(&[
                Turn::system("rules"),
                Turn::human("Where was Alice born?"),
                Turn::assistant("Lyon"),
                Turn::human("When?"),
            ])
            .await
            .unwrap();
        assert_eq!(reply, "In 1990.");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        for (status, check) in [
            (401u16, LlmError::Authentication("denied".to_string())),
            (429u16, LlmError::RateLimited),
        ] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(status).set_body_string("denied"))
                .mount(&server)
                .await;
            let model = OpenAiCompatibleModel::new(config_for(&server), Some("k".to_string()));
            let err = model.complete(&[Turn::human("hi")]).await.unwrap_err();
            assert_eq!(err, check);
        }
    }

    #[tokio::test]
    async fn test_server_error_is_invalid_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;
        let model = OpenAiCompatibleModel::new(config_for(&server), Some("k".to_string()));
        let err = model.complete(&[Turn::human("hi")]).await.unwrap_err();
        assert_eq!(err, LlmError::InvalidRequest("HTTP 500: boom".to_string()));
    }

    #[tokio::test]
    async fn test_missing_choices_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;
        let model = OpenAiCompatibleModel::new(config_for(&server), Some("k".to_string()));
        let err = model.complete(&[Turn::human("hi")]).await.unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[tokio::test]
    async fn test_trailing_slash_base_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .mount(&server)
            .await;
        let config = LlmConfig {
            base_url: format!("{}/", server.uri()),
            ..config_for(&server)
        };
        let model = OpenAiCompatibleModel::new(config, Some("k".to_string()));
        assert_eq!(model.complete(&[Turn::human("hi")]).await.unwrap(), "ok");
    }
}
