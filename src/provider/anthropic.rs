use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{Result, SetupError};
use crate::wire::{Completion, Message, Role};
use super::{InferenceRequest, Provider};

pub struct Anthropic {
    client: Client,
    api_key: String,
    api_base: String,
    api_version: String,
}

impl Anthropic {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.into(),
            api_base: "https://api.anthropic.com".into(),
            api_version: "2023-06-01".into(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }
}

#[derive(Serialize)]
struct MsgRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Msg<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MsgResponse {
    #[serde(default)]
    content: Vec<Block>,
}

#[derive(Deserialize)]
struct Block {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    r#type: String,
}

/// The messages API takes the system prompt as a top-level field, so system
/// turns are joined into it and the rest pass through in order.
fn split_system(messages: &[Message]) -> (Option<String>, Vec<Msg<'_>>) {
    let mut system: Vec<&str> = Vec::new();
    let mut rest = Vec::new();
    for m in messages {
        match m.role() {
            Role::System => system.push(m.content()),
            role => rest.push(Msg { role: role.as_str(), content: m.content() }),
        }
    }
    let system = (!system.is_empty()).then(|| system.join("\n\n"));
    (system, rest)
}

#[async_trait]
impl Provider for Anthropic {
    async fn complete(&self, req: &InferenceRequest<'_>) -> Result<Completion> {
        let url = format!("{}/v1/messages", self.api_base.trim_end_matches('/'));
        let (system, messages) = split_system(req.messages);
        let body = MsgRequest {
            model: req.resolved_model(),
            max_tokens: req.context.max_tokens,
            temperature: req.context.temperature,
            messages,
            system,
        };

        tracing::debug!(%url, model = body.model, action = req.action, "anthropic request");

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        tracing::debug!(%status, bytes = text.len(), "anthropic response");

        if !status.is_success() {
            return Err(SetupError::Provider(format!("Anthropic API error ({}): {}", status, text)));
        }

        let parsed: MsgResponse = serde_json::from_str(&text)
            .map_err(|e| SetupError::Provider(format!("anthropic response parse error: {e}")))?;

        Ok(parsed
            .content
            .into_iter()
            .find(|b| b.r#type == "text")
            .and_then(|b| b.text)
            .map(Completion::Text)
            .unwrap_or(Completion::Empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InferenceContext;
    use serde_json::json;
    use std::collections::BTreeMap;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ctx() -> InferenceContext {
        InferenceContext {
            default_model: "claude-sonnet-4-5".into(),
            regeneration_model: "claude-haiku-4-5".into(),
            routes: BTreeMap::new(),
            temperature: 0.0,
            max_tokens: 1024,
        }
    }

    #[test]
    fn system_turn_is_lifted_out() {
        let msgs = [Message::system("sys"), Message::user("u"), Message::assistant("a")];
        let (system, rest) = split_system(&msgs);
        assert_eq!(system.as_deref(), Some("sys"));
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].role, "user");
        assert_eq!(rest[1].role, "assistant");
    }

    #[tokio::test]
    async fn text_block_becomes_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "k"))
            .and(body_partial_json(json!({ "model": "claude-sonnet-4-5", "system": "sys" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "text", "text": "```bash\nbun add zod\n```" }]
            })))
            .mount(&server)
            .await;

        let p = Anthropic::new("k", Duration::from_secs(5)).unwrap().with_base_url(server.uri());
        let c = ctx();
        let msgs = [Message::system("sys"), Message::user("u")];
        let req = InferenceRequest { action: "projectSetup", messages: &msgs, context: &c, model: None };
        assert_eq!(p.complete(&req).await.unwrap(), Completion::Text("```bash\nbun add zod\n```".into()));
    }

    #[tokio::test]
    async fn no_text_block_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "tool_use", "id": "t1", "name": "x", "input": {} }]
            })))
            .mount(&server)
            .await;

        let p = Anthropic::new("k", Duration::from_secs(5)).unwrap().with_base_url(server.uri());
        let c = ctx();
        let msgs = [Message::system("sys"), Message::user("u")];
        let req = InferenceRequest { action: "projectSetup", messages: &msgs, context: &c, model: None };
        assert_eq!(p.complete(&req).await.unwrap(), Completion::Empty);
    }
}
