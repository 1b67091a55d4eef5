//! Outgoing message cleanup before they reach the model provider.
//!
//! The provider rejects a conversation that contains a message with empty
//! content unless that message carries tool calls (which then form the
//! content block).

use super::message::ChatMessage;

/// Content substituted for an empty message
pub const EMPTY_CONTENT_PLACEHOLDER: &str = " ";

/// Replaces empty content with a single space when the message has no tool
/// calls; any other message is returned as is.
pub fn sanitize_message(mut msg: ChatMessage) -> ChatMessage {
    if msg.content.is_empty() && msg.tool_calls.is_empty() {
        msg.content = EMPTY_CONTENT_PLACEHOLDER.to_string();
    }
    msg
}

/// Applies [`sanitize_message`] to each message, keeping the order
pub fn sanitize_messages(messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
    messages.into_iter().map(sanitize_message).collect()
}
