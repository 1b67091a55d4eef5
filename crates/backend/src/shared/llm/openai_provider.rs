use super::tool_calls::ToolCallAccumulator;
use super::types::{
    ChatMessage, ChatRole, LlmChunk, LlmError, LlmProvider, LlmStream, ToolDefinition,
};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionMessageToolCall, ChatCompletionMessageToolCalls,
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestToolMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionResponseStream, ChatCompletionTool,
        ChatCompletionTools, CreateChatCompletionRequestArgs, CreateChatCompletionStreamResponse,
        FunctionCall, FunctionObject,
    },
    Client,
};
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::VecDeque;

/// Provider for OpenAI-compatible chat-completions endpoints
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiProvider {
    /// Создать с кастомным endpoint (для совместимых API)
    pub fn new_with_endpoint(
        api_endpoint: String,
        api_key: String,
        model: String,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_endpoint);
        let client = Client::with_config(config);

        Self {
            client,
            model,
            temperature,
            max_tokens,
        }
    }

    /// Конвертировать наши сообщения в формат OpenAI
    fn convert_messages(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
        let mut openai_messages = Vec::with_capacity(messages.len());

        for msg in messages {
            let openai_msg = match msg.role {
                ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
                    .content(msg.content)
                    .build()
                    .map_err(|e| LlmError::InvalidRequest(e.to_string()))?
                    .into(),
                ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(msg.content)
                    .build()
                    .map_err(|e| LlmError::InvalidRequest(e.to_string()))?
                    .into(),
                ChatRole::Assistant => {
                    let mut builder = ChatCompletionRequestAssistantMessageArgs::default();
                    if !msg.content.is_empty() {
                        builder.content(msg.content.as_str());
                    }
                    if !msg.tool_calls.is_empty() {
                        let openai_tool_calls: Vec<ChatCompletionMessageToolCalls> = msg
                            .tool_calls
                            .iter()
                            .map(|tc| {
                                ChatCompletionMessageToolCalls::Function(
                                    ChatCompletionMessageToolCall {
                                        id: tc.id.clone(),
                                        function: FunctionCall {
                                            name: tc.name.clone(),
                                            arguments: tc.arguments.clone(),
                                        },
                                    },
                                )
                            })
                            .collect();
                        builder.tool_calls(openai_tool_calls);
                    }
                    builder
                        .build()
                        .map_err(|e| LlmError::InvalidRequest(e.to_string()))?
                        .into()
                }
                ChatRole::Tool => {
                    let tool_call_id = msg.tool_call_id.clone().unwrap_or_default();
                    ChatCompletionRequestToolMessageArgs::default()
                        .content(msg.content)
                        .tool_call_id(tool_call_id)
                        .build()
                        .map_err(|e| LlmError::InvalidRequest(e.to_string()))?
                        .into()
                }
            };
            openai_messages.push(openai_msg);
        }

        Ok(openai_messages)
    }

    /// Конвертировать определения инструментов в формат OpenAI
    fn convert_tools(&self, tools: Vec<ToolDefinition>) -> Vec<ChatCompletionTools> {
        tools
            .into_iter()
            .map(|t| {
                ChatCompletionTools::Function(ChatCompletionTool {
                    function: FunctionObject {
                        name: t.name,
                        description: Some(t.description),
                        parameters: Some(t.parameters),
                        strict: None,
                    },
                })
            })
            .collect()
    }
}

fn map_openai_error(e: OpenAIError) -> LlmError {
    let err_str = e.to_string();
    match e {
        OpenAIError::Reqwest(_) => LlmError::NetworkError(err_str),
        _ if err_str.contains("401") || err_str.contains("authentication") => {
            LlmError::AuthError(err_str)
        }
        _ if err_str.contains("429") || err_str.contains("rate limit") => {
            LlmError::RateLimitExceeded
        }
        _ => LlmError::ApiError(err_str),
    }
}

/// State carried between polls of the outgoing stream
struct StreamState {
    upstream: ChatCompletionResponseStream,
    tool_calls: ToolCallAccumulator,
    ready: VecDeque<Result<LlmChunk, LlmError>>,
    finished: bool,
}

impl StreamState {
    fn absorb(&mut self, response: CreateChatCompletionStreamResponse) {
        for choice in response.choices {
            if let Some(content) = choice.delta.content.filter(|c| !c.is_empty()) {
                self.ready.push_back(Ok(LlmChunk::Text(content)));
            }
            for chunk in choice.delta.tool_calls.unwrap_or_default() {
                let (name, arguments) = match &chunk.function {
                    Some(f) => (f.name.as_deref(), f.arguments.as_deref()),
                    None => (None, None),
                };
                self.tool_calls
                    .push(chunk.index, chunk.id.as_deref(), name, arguments);
            }
            if choice.finish_reason.is_some() {
                self.flush_tool_calls();
            }
        }
    }

    fn flush_tool_calls(&mut self) {
        for call in self.tool_calls.drain() {
            self.ready.push_back(Ok(LlmChunk::ToolCall(call)));
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn chat_completion_stream(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
    ) -> Result<LlmStream, LlmError> {
        let openai_messages = self.convert_messages(messages)?;

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder
            .model(&self.model)
            .messages(openai_messages)
            .temperature(self.temperature)
            .max_completion_tokens(self.max_tokens)
            .stream(true);

        if !tools.is_empty() {
            request_builder.tools(self.convert_tools(tools));
        }

        let request = request_builder
            .build()
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))?;

        let upstream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(map_openai_error)?;

        let state = StreamState {
            upstream,
            tool_calls: ToolCallAccumulator::new(),
            ready: VecDeque::new(),
            finished: false,
        };

        let stream = futures::stream::unfold(state, |mut state| async move {
            loop {
                if let Some(item) = state.ready.pop_front() {
                    return Some((item, state));
                }
                if state.finished {
                    return None;
                }
                match state.upstream.next().await {
                    Some(Ok(response)) => state.absorb(response),
                    Some(Err(e)) => {
                        state.finished = true;
                        state.ready.push_back(Err(map_openai_error(e)));
                    }
                    None => {
                        state.finished = true;
                        state.flush_tool_calls();
                    }
                }
            }
        });

        Ok(stream.boxed())
    }

    fn provider_name(&self) -> &str {
        "OpenAI-compatible"
    }
}
