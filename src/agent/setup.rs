use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::context::{Blueprint, Template};
use crate::conversation::ConversationLog;
use crate::errors::Result;
use crate::extract::extract_commands;
use crate::prompt;
use crate::provider::{DynProvider, InferenceContext};
use crate::wire::{Completion, Message, SetupCommandsResult};

use super::Agent;

pub const PROJECT_SETUP_ACTION: &str = "projectSetup";

/// Works out which packages a project still needs on top of its template.
///
/// `generate_setup_commands` takes `&mut self`, so one instance serves one
/// caller at a time. Each call sees every turn of the calls before it.
pub struct SetupAgent {
    agent: Agent,
    query: String,
}

impl SetupAgent {
    pub fn new(
        query: impl Into<String>,
        blueprint: &Blueprint,
        template: &Template,
        provider: DynProvider,
        context: InferenceContext,
    ) -> Self {
        let query = query.into();
        let mut agent = Agent::new(provider, context, Message::system(prompt::system_prompt_setup()));
        agent.append([Message::user(prompt::user_prompt_setup(&query, blueprint, template))]);
        debug!(template = %template.name, installed = template.installed().len(), "setup agent ready");
        Self { agent, query }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn log(&self) -> &ConversationLog {
        self.agent.log()
    }

    /// Ask for install commands. Pass the error from a failed run to get a
    /// corrected list; an empty error counts as no error.
    ///
    /// Only a failed exchange with the backend is an `Err`. A reply with no
    /// usable text gives an empty result and leaves no assistant turn.
    pub async fn generate_setup_commands(&mut self, error: Option<&str>) -> Result<SetupCommandsResult> {
        let error = error.filter(|e| !e.is_empty());
        let attempt = if error.is_some() { "regenerate" } else { "first" };
        let span = info_span!("setup_agent", query = %self.query, attempt);
        self.run(error).instrument(span).await
    }

    async fn run(&mut self, error: Option<&str>) -> Result<SetupCommandsResult> {
        let turn = match error {
            None => prompt::user_prompt_commands(),
            Some(e) => prompt::user_prompt_regenerate(e),
        };
        self.agent.append([Message::user(turn)]);

        let model = error.map(|_| self.agent.context().regeneration_model.as_str());
        let resolved = self.agent.context().resolve_model(PROJECT_SETUP_ACTION, model).to_string();
        info!(action = PROJECT_SETUP_ACTION, model = %resolved, turns = self.agent.log().len(), "requesting setup commands");

        let completion = match self.agent.dispatch(PROJECT_SETUP_ACTION, model).await {
            Ok(c) => c,
            Err(e) => {
                error!(error = %e, "inference request failed");
                return Err(e);
            }
        };

        let text = match completion {
            Completion::Empty => {
                warn!("inference returned no text payload; no setup commands");
                return Ok(SetupCommandsResult::empty());
            }
            Completion::Text(t) if t.is_empty() => {
                warn!("inference returned an empty string; no setup commands");
                return Ok(SetupCommandsResult::empty());
            }
            Completion::Text(t) => t,
        };

        let commands = extract_commands(&text);
        self.agent.append([Message::assistant(text)]);
        info!(commands = commands.len(), "setup commands extracted");
        Ok(SetupCommandsResult { commands })
    }
}
