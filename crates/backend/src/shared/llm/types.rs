use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use contracts::shared::copilot::{ChatMessage, ChatRole, ToolCall};

/// Ошибки LLM провайдера
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Function the model may call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments
    pub parameters: serde_json::Value,
}

/// Piece of a streamed model answer
#[derive(Debug, Clone, PartialEq)]
pub enum LlmChunk {
    Text(String),
    /// A complete tool call, emitted once all of its fragments arrived
    ToolCall(ToolCall),
}

pub type LlmStream = BoxStream<'static, Result<LlmChunk, LlmError>>;

/// Трейт для LLM провайдеров
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Starts a streaming chat completion. Errors raised before the first
    /// chunk are returned directly, later ones arrive inside the stream.
    async fn chat_completion_stream(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
    ) -> Result<LlmStream, LlmError>;

    /// Получить название провайдера
    fn provider_name(&self) -> &str;
}
