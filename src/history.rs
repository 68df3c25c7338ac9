use crate::providers::Message;

/// Default cap: the system message plus the five most recent exchanges.
pub const DEFAULT_HISTORY_LIMIT: usize = 11;

const MIN_HISTORY_LIMIT: usize = 2;

/// Transcript sent to the completion endpoint.
///
/// The first entry is always the single system message. Everything after it
/// is a trailing window, trimmed after every append so the total length never
/// exceeds `max_messages`.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    system: Message,
    window: Vec<Message>,
    max_messages: usize,
}

impl ConversationHistory {
    pub fn new(system_prompt: impl Into<String>, max_messages: usize) -> Self {
        Self {
            system: Message::system(system_prompt),
            window: Vec::new(),
            max_messages: max_messages.max(MIN_HISTORY_LIMIT),
        }
    }

    pub fn append_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    pub fn append_assistant(&mut self, content: impl Into<String>) {
        self.push(Message::assistant(content));
    }

    fn push(&mut self, message: Message) {
        self.window.push(message);
        self.trim(self.max_messages - 1);
    }

    /// Keeps only the `max_non_system` most recent messages after the system one.
    pub fn trim(&mut self, max_non_system: usize) {
        if self.window.len() > max_non_system {
            let excess = self.window.len() - max_non_system;
            self.window.drain(..excess);
            tracing::trace!(evicted = excess, "conversation history trimmed");
        }
    }

    pub fn snapshot(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.window.len() + 1);
        messages.push(self.system.clone());
        messages.extend(self.window.iter().cloned());
        messages
    }

    pub fn len(&self) -> usize {
        self.window.len() + 1
    }

    /// Most recent message; the system message when nothing was appended.
    pub fn last(&self) -> &Message {
        self.window.last().unwrap_or(&self.system)
    }
}
