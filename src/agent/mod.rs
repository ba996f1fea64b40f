use crate::conversation::ConversationLog;
use crate::errors::Result;
use crate::provider::{DynProvider, InferenceContext, InferenceRequest};
use crate::wire::{Completion, Message};

pub mod setup;

pub use setup::SetupAgent;

/// A system prompt, a conversation log and a backend to extend it with.
/// Domain agents wrap this and supply the protocol.
pub struct Agent {
    provider: DynProvider,
    context: InferenceContext,
    log: ConversationLog,
}

impl Agent {
    pub fn new(provider: DynProvider, context: InferenceContext, system: Message) -> Self {
        Self {
            provider,
            context,
            log: ConversationLog::new(system),
        }
    }

    pub fn append<I>(&mut self, messages: I) -> &[Message]
    where
        I: IntoIterator<Item = Message>,
    {
        self.log.append(messages)
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn context(&self) -> &InferenceContext {
        &self.context
    }

    /// Send the whole log to the backend. Nothing is appended here; the
    /// caller decides what to record once the reply is in hand.
    pub async fn dispatch(&self, action: &str, model: Option<&str>) -> Result<Completion> {
        let req = InferenceRequest {
            action,
            messages: self.log.messages(),
            context: &self.context,
            model,
        };
        self.provider.complete(&req).await
    }
}
