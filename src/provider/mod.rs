use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::ProviderKind;
use crate::config::Config;
use crate::errors::{Result, SetupError};
use crate::wire::{Completion, Message};

pub mod openai;
pub mod anthropic;
pub mod ollama;

/// Model routing and sampling settings handed through to the backend
/// untouched. The agent only ever reads it.
#[derive(Debug, Clone)]
pub struct InferenceContext {
    pub default_model: String,
    pub regeneration_model: String,
    pub routes: BTreeMap<String, String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl InferenceContext {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            default_model: cfg.model.clone(),
            regeneration_model: cfg.regeneration_model.clone(),
            routes: cfg.routes.clone(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
        }
    }

    /// Explicit override, then the per-action route, then the default model.
    pub fn resolve_model<'a>(&'a self, action: &str, model: Option<&'a str>) -> &'a str {
        model
            .or_else(|| self.routes.get(action).map(String::as_str))
            .unwrap_or(&self.default_model)
    }
}

pub struct InferenceRequest<'a> {
    pub action: &'a str,
    pub messages: &'a [Message],
    pub context: &'a InferenceContext,
    pub model: Option<&'a str>,
}

impl InferenceRequest<'_> {
    pub fn resolved_model(&self) -> &str {
        self.context.resolve_model(self.action, self.model)
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    /// `Err` means the exchange itself failed; a response without usable
    /// text is `Ok(Completion::Empty)`.
    async fn complete(&self, req: &InferenceRequest<'_>) -> Result<Completion>;
}

pub type DynProvider = Arc<dyn Provider>;

pub fn make_provider(cfg: &Config) -> Result<DynProvider> {
    let timeout = Duration::from_secs(cfg.timeout_secs);
    match cfg.provider {
        ProviderKind::OpenAI => {
            let api_key = std::env::var("OPENAI_API_KEY")
                .map_err(|_| SetupError::Config("OPENAI_API_KEY env var is not set".into()))?;
            let mut p = openai::OpenAIProvider::new(api_key, timeout)?;
            if let Some(base) = &cfg.api_base {
                p = p.with_base_url(base.clone());
            }
            Ok(Arc::new(p))
        }
        ProviderKind::Anthropic => {
            let api_key = std::env::var("ANTHROPIC_API_KEY")
                .map_err(|_| SetupError::Config("ANTHROPIC_API_KEY env var is not set".into()))?;
            let mut p = anthropic::Anthropic::new(api_key, timeout)?;
            if let Some(base) = &cfg.api_base {
                p = p.with_base_url(base.clone());
            }
            Ok(Arc::new(p))
        }
        ProviderKind::Ollama => {
            let url = cfg
                .ollama_url
                .clone()
                .unwrap_or_else(|| "http://localhost:11434".into());
            Ok(Arc::new(ollama::Ollama::new(url, timeout)?))
        }
    }
}
