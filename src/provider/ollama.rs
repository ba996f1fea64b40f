use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{Result, SetupError};
use crate::wire::Completion;
use super::{InferenceRequest, Provider};

pub struct Ollama {
    client: Client,
    url: String,
}

impl Ollama {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url: url.into(),
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<MsgOut>,
}

#[derive(Deserialize)]
struct MsgOut {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl Provider for Ollama {
    async fn complete(&self, req: &InferenceRequest<'_>) -> Result<Completion> {
        let url = format!("{}/api/chat", self.url.trim_end_matches('/'));
        let body = ChatRequest {
            model: req.resolved_model(),
            messages: req
                .messages
                .iter()
                .map(|m| Msg { role: m.role().as_str(), content: m.content() })
                .collect(),
            stream: false,
            options: OllamaOptions {
                temperature: req.context.temperature,
                num_predict: req.context.max_tokens,
            },
        };

        tracing::debug!(%url, model = body.model, action = req.action, "ollama request");

        let resp = self.client.post(&url).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        tracing::debug!(%status, bytes = text.len(), "ollama response");

        if !status.is_success() {
            return Err(SetupError::Provider(format!("Ollama error ({}): {}", status, text)));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| SetupError::Provider(format!("ollama response parse error: {e}")))?;

        Ok(parsed
            .message
            .and_then(|m| m.content)
            .map(Completion::Text)
            .unwrap_or(Completion::Empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InferenceContext;
    use crate::wire::Message;
    use serde_json::json;
    use std::collections::BTreeMap;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn chat_roundtrip_without_streaming() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({ "model": "llama3.1", "stream": false })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": { "role": "assistant", "content": "npm i chart.js" },
                "done": true
            })))
            .mount(&server)
            .await;

        let c = InferenceContext {
            default_model: "llama3.1".into(),
            regeneration_model: "llama3.2:1b".into(),
            routes: BTreeMap::new(),
            temperature: 0.1,
            max_tokens: 256,
        };
        let p = Ollama::new(server.uri(), Duration::from_secs(5)).unwrap();
        let msgs = [Message::system("sys"), Message::user("u")];
        let req = InferenceRequest { action: "projectSetup", messages: &msgs, context: &c, model: None };
        assert_eq!(p.complete(&req).await.unwrap(), Completion::Text("npm i chart.js".into()));
    }
}
