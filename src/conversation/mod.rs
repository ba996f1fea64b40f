use crate::wire::{Message, Role};

/// Append-only message history. The first entry is always the system
/// message the log was created with; nothing is ever removed or reordered.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new(system: Message) -> Self {
        debug_assert_eq!(system.role(), Role::System);
        Self { messages: vec![system] }
    }

    /// Concatenate `messages` onto the log and return the full snapshot,
    /// ready to hand to the inference backend.
    pub fn append<I>(&mut self, messages: I) -> &[Message]
    where
        I: IntoIterator<Item = Message>,
    {
        self.messages.extend(messages);
        &self.messages
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn system(&self) -> &Message {
        &self.messages[0]
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_with_system_message() {
        let log = ConversationLog::new(Message::system("be precise"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.system().content(), "be precise");
    }

    #[test]
    fn append_returns_full_snapshot() {
        let mut log = ConversationLog::new(Message::system("sys"));
        let snapshot = log.append([Message::user("a"), Message::assistant("b")]);
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].role(), Role::System);
        assert_eq!(snapshot[2].content(), "b");
    }

    #[test]
    fn existing_entries_never_change() {
        let mut log = ConversationLog::new(Message::system("sys"));
        log.append([Message::user("first")]);
        let before: Vec<Message> = log.messages().to_vec();

        let mut lens = vec![log.len()];
        for i in 0..4 {
            log.append([Message::assistant(format!("reply {i}"))]);
            log.append(Vec::new());
            lens.push(log.len());
        }

        assert!(lens.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(&log.messages()[..before.len()], &before[..]);
        assert_eq!(log.system().content(), "sys");
    }
}
