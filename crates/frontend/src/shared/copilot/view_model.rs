//! Copilot thread - folding runtime events into chat messages

use contracts::shared::copilot::{ChatMessage, ChatRole, CopilotEvent, ToolCall};
use serde_json::Value;

/// What an event means for the surrounding UI besides the thread itself
#[derive(Debug, Clone, PartialEq)]
pub enum EventEffect {
    None,
    /// A client-side action the model wants to run
    ClientToolCall(ToolCall),
    AgentState { agent: String, state: Value },
    Error(String),
    Done(Option<String>),
}

/// Applies one runtime event to the thread. Consecutive text deltas grow
/// the same assistant message.
pub fn apply_event(messages: &mut Vec<ChatMessage>, event: CopilotEvent) -> EventEffect {
    match event {
        CopilotEvent::TextDelta { content } => {
            match messages.last_mut() {
                Some(last) if last.role == ChatRole::Assistant && !last.has_tool_calls() => {
                    last.content.push_str(&content)
                }
                _ => messages.push(ChatMessage::assistant(content)),
            }
            EventEffect::None
        }
        CopilotEvent::ToolCall {
            id,
            name,
            arguments,
        } => {
            let call = ToolCall {
                id,
                name,
                arguments,
            };
            messages.push(ChatMessage::assistant_tool_calls(vec![call.clone()]));
            EventEffect::ClientToolCall(call)
        }
        CopilotEvent::ActionResult {
            tool_call_id,
            name,
            result,
        } => {
            // executed server side; the call itself is recorded so that the
            // result has a matching request in the next turn
            if !has_tool_call(messages, &tool_call_id) {
                messages.push(ChatMessage::assistant_tool_calls(vec![ToolCall {
                    id: tool_call_id.clone(),
                    name,
                    arguments: "{}".to_string(),
                }]));
            }
            let content = match result {
                Value::String(s) => s,
                other => other.to_string(),
            };
            messages.push(ChatMessage::tool_result(tool_call_id, content));
            EventEffect::None
        }
        CopilotEvent::AgentState { agent, state } => EventEffect::AgentState { agent, state },
        CopilotEvent::Error { message } => EventEffect::Error(message),
        CopilotEvent::Done { thread_id } => EventEffect::Done(thread_id),
    }
}

/// Extra turns a single user message may trigger
pub const MAX_FOLLOW_UPS: usize = 3;

/// A turn whose tool calls were answered goes back to the model so it can
/// use the results; an error ends the exchange instead
pub fn needs_follow_up(events: &[CopilotEvent]) -> bool {
    let mut answered = false;
    for event in events {
        match event {
            CopilotEvent::ToolCall { .. } | CopilotEvent::ActionResult { .. } => answered = true,
            CopilotEvent::Error { .. } => return false,
            _ => {}
        }
    }
    answered
}

/// One-line status for a working agent: its reported `progress` if any
pub fn agent_status_line(agent: &str, state: &Value) -> String {
    match state.get("progress").and_then(Value::as_str) {
        Some(progress) if !progress.is_empty() => progress.to_string(),
        _ => format!("{} is working...", agent),
    }
}

fn has_tool_call(messages: &[ChatMessage], id: &str) -> bool {
    messages
        .iter()
        .any(|m| m.tool_calls.iter().any(|c| c.id == id))
}

/// Whether a tool call already has its result in the thread
pub fn has_tool_result(messages: &[ChatMessage], tool_call_id: &str) -> bool {
    messages
        .iter()
        .any(|m| m.role == ChatRole::Tool && m.tool_call_id.as_deref() == Some(tool_call_id))
}

/// Parsed tool-call arguments; malformed JSON yields an empty object
pub fn parse_arguments(arguments: &str) -> Value {
    serde_json::from_str(arguments).unwrap_or_else(|_| Value::Object(Default::default()))
}
