use crate::catalog::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Advisor,
    Routine,
    Notice,
    Error,
}

/// One entry in the rendered chat transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl ChatMessage {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Handle for a displayed loading indicator. Each token is cleared once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadingToken(pub u64);

/// Where the advisor renders its transitions.
pub trait ChatSurface: Send + Sync {
    fn show_message(&self, message: ChatMessage);

    fn show_loading(&self, label: &str) -> LoadingToken;

    fn clear_loading(&self, token: LoadingToken);

    fn selection_changed(&self, selection: &[Product]);
}

/// Clears its loading indicator when dropped, including when the request
/// future is cancelled mid-flight.
pub(crate) struct LoadingGuard<'a> {
    surface: &'a dyn ChatSurface,
    token: LoadingToken,
}

impl<'a> LoadingGuard<'a> {
    pub(crate) fn show(surface: &'a dyn ChatSurface, label: &str) -> Self {
        let token = surface.show_loading(label);
        Self { surface, token }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.surface.clear_loading(self.token);
    }
}
