use serde::{Deserialize, Serialize};

/// ========================================
/// Conversation and result types
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One conversation turn. Fields are private so a message cannot change
/// after it has been created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered install commands; order is the suggested execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupCommandsResult {
    pub commands: Vec<String>,
}

impl SetupCommandsResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// What the inference backend handed back when the exchange itself worked.
/// Transport failures travel in the `Err` arm of the provider call instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Text payload, possibly the empty string.
    Text(String),
    /// No usable payload: no choices, null content, or a non-text block.
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_with_lowercase_role() {
        let m = Message::assistant("bun add zod");
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["role"], "assistant");
        assert_eq!(v["content"], "bun add zod");
    }

    #[test]
    fn result_serializes_as_commands_object() {
        let r = SetupCommandsResult { commands: vec!["npm i a".into()] };
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"commands":["npm i a"]}"#);
        assert!(SetupCommandsResult::empty().is_empty());
    }
}
