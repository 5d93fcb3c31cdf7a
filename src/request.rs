//! Outbound payload construction for the chat-completions endpoint.

use nonempty::NonEmpty;
use serde::Serialize;

use crate::config::Configuration;
use crate::error::Error;
use crate::model::{Conversation, Message};

/// JSON body POSTed to the endpoint. Always a streaming request; the
/// one-shot convenience in [`session`](crate::session) drains the stream
/// itself rather than asking the endpoint for a different shape.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: NonEmpty<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

/// Assemble the request payload, re-checking the configuration so a bad
/// one can never reach the network.
pub fn build(conversation: &Conversation, config: &Configuration) -> Result<ChatRequest, Error> {
    config.validate()?;

    let messages = NonEmpty::from_vec(conversation.request_messages()).ok_or_else(|| {
        Error::Config("conversation must contain at least one message".to_string())
    })?;

    Ok(ChatRequest {
        model: config.model.clone(),
        messages,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        stream: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let mut conversation = Conversation::new();
        conversation.push(Message::user("Continue this."));
        let config = Configuration::new("key")
            .with_model("gpt-4o-mini")
            .with_max_tokens(100)
            .with_temperature(0.5);

        let request = build(&conversation, &config).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "Continue this."}],
                "max_tokens": 100,
                "temperature": 0.5,
                "stream": true,
            })
        );
    }

    #[test]
    fn test_context_becomes_leading_system_message() {
        let mut conversation = Conversation::new().with_context("Document body.");
        conversation.push(Message::user("Continue this."));

        let request = build(&conversation, &Configuration::new("key")).unwrap();
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages.first().content, "Document body.");
    }

    #[test]
    fn test_empty_conversation_is_rejected() {
        let err = build(&Conversation::new(), &Configuration::new("key")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let mut conversation = Conversation::new();
        conversation.push(Message::user("hi"));
        let err = build(&conversation, &Configuration::new("")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
