pub mod message;
pub mod protocol;
pub mod sanitize;
pub mod sse;

pub use message::{ChatMessage, ChatRole, ToolCall};
pub use protocol::*;
pub use sanitize::{sanitize_message, sanitize_messages, EMPTY_CONTENT_PLACEHOLDER};
pub use sse::{parse_event_stream, SseDecoder};
