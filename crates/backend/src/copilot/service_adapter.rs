use std::sync::Arc;

use contracts::shared::copilot::sanitize_messages;

use crate::shared::llm::{ChatMessage, LlmError, LlmProvider, LlmStream, ToolDefinition};

/// Bridges the runtime's chat turns to the model provider.
///
/// Every outgoing message passes through the sanitizer first; the provider
/// stream is handed back untouched, errors included.
#[derive(Clone)]
pub struct SanitizingAdapter {
    provider: Arc<dyn LlmProvider>,
}

impl SanitizingAdapter {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    pub async fn process(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
    ) -> Result<LlmStream, LlmError> {
        let messages = sanitize_messages(messages);
        tracing::debug!(
            provider = self.provider.provider_name(),
            messages = messages.len(),
            tools = tools.len(),
            "forwarding chat turn"
        );
        self.provider.chat_completion_stream(messages, tools).await
    }
}
