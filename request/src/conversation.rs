use crate::message::{Message, Role};

/// The fixed message list sent with a single chat completions request.
///
/// Holds one system and one user message and is not mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system), Message::user(user)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The last user message, i.e. the question being asked.
    pub fn question(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role() == Role::User)
            .map_or("", Message::content)
    }
}
