use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::errors::{Result, SetupError};
use crate::wire::Completion;
use super::{InferenceRequest, Provider};

/// OpenAI chat completions. The conversation log is sent as-is, one wire
/// message per turn.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn complete(&self, req: &InferenceRequest<'_>) -> Result<Completion> {
        let model = req.resolved_model();
        let messages: Vec<_> = req
            .messages
            .iter()
            .map(|m| json!({ "role": m.role().as_str(), "content": m.content() }))
            .collect();

        let body = json!({
            "model": model,
            "messages": messages,
            "temperature": req.context.temperature,
            "max_tokens": req.context.max_tokens,
        });

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        tracing::debug!(%url, model, action = req.action, turns = req.messages.len(), "openai request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        tracing::debug!(%status, bytes = text.len(), "openai response");

        if !status.is_success() {
            return Err(SetupError::Provider(format!("OpenAI API error ({}): {}", status, text)));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| SetupError::Provider(format!("failed to parse OpenAI response: {e}\nRaw: {text}")))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(Completion::Text)
            .unwrap_or(Completion::Empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InferenceContext;
    use crate::wire::Message;
    use std::collections::BTreeMap;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ctx() -> InferenceContext {
        InferenceContext {
            default_model: "gpt-4.1".into(),
            regeneration_model: "gpt-4.1-mini".into(),
            routes: BTreeMap::new(),
            temperature: 0.2,
            max_tokens: 512,
        }
    }

    fn provider(server: &MockServer) -> OpenAIProvider {
        OpenAIProvider::new("test_key", Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn sends_log_and_pinned_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test_key"))
            .and(body_partial_json(json!({
                "model": "gpt-4.1-mini",
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "hi" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "```bash\nnpm i a\n```" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let c = ctx();
        let msgs = [Message::system("sys"), Message::user("hi")];
        let req = InferenceRequest { action: "projectSetup", messages: &msgs, context: &c, model: Some("gpt-4.1-mini") };
        let out = provider(&server).complete(&req).await.unwrap();
        assert_eq!(out, Completion::Text("```bash\nnpm i a\n```".into()));
    }

    #[tokio::test]
    async fn null_content_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": null } }]
            })))
            .mount(&server)
            .await;

        let c = ctx();
        let msgs = [Message::system("sys")];
        let req = InferenceRequest { action: "projectSetup", messages: &msgs, context: &c, model: None };
        assert_eq!(provider(&server).complete(&req).await.unwrap(), Completion::Empty);
    }

    #[tokio::test]
    async fn error_status_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let c = ctx();
        let msgs = [Message::system("sys")];
        let req = InferenceRequest { action: "projectSetup", messages: &msgs, context: &c, model: None };
        let err = provider(&server).complete(&req).await.unwrap_err();
        assert!(matches!(err, SetupError::Provider(ref s) if s.contains("500")));
    }
}
