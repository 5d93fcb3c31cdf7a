//! Conversation data model: roles, messages, and the ordered history
//! sent to the completion endpoint.

use serde::{Deserialize, Serialize};

/// Role of the message sender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a conversation.
///
/// Serializes to the wire shape `{"role": "...", "content": "..."}`.
/// Messages are immutable once appended to a [`Conversation`]; the one
/// exception is the in-flight assistant message a streaming session
/// grows internally until it is sealed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// An ordered conversation plus optional ambient context.
///
/// Insertion order is chronological order is wire order. The ambient
/// context (typically the text of the document the assistant is embedded
/// in) is kept *outside* the visible message list: it materializes as a
/// synthesized leading system message when the outbound request is
/// assembled, and is never persisted back into [`messages`].
///
/// [`messages`]: Conversation::messages
///
/// # Example
/// ```
/// use continuo::{Conversation, Message};
///
/// let mut conversation = Conversation::new()
///     .with_context("# Notes\nRust is a systems language.");
/// conversation.push(Message::user("Continue the notes above."));
///
/// assert_eq!(conversation.messages().len(), 1);
/// assert_eq!(conversation.request_messages().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    context: Option<String>,
    messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach ambient context, e.g. the current document text.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Replace the ambient context in place.
    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = Some(context.into());
    }

    /// Append a message to the visible history.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The visible message history, excluding any synthesized context.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True when neither context nor messages are present.
    pub fn is_empty(&self) -> bool {
        self.context.is_none() && self.messages.is_empty()
    }

    /// Materialize the outbound message list.
    ///
    /// Ambient context becomes the first element as a system message;
    /// the visible history follows in order. The synthesized message
    /// exists only in the returned list.
    pub fn request_messages(&self) -> Vec<Message> {
        let mut out = Vec::with_capacity(self.messages.len() + 1);
        if let Some(context) = &self.context {
            out.push(Message::system(context.clone()));
        }
        out.extend(self.messages.iter().cloned());
        out
    }
}
