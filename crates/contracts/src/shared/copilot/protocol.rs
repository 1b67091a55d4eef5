//! Wire format between the dashboard, the copilot runtime and remote
//! agent/tool endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::message::ChatMessage;

/// Body of `POST /api/copilotkit`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CopilotRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
    #[serde(default)]
    pub context: Vec<ReadableContext>,
    /// Route the turn to a remote agent instead of the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

/// Page state the assistant may read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadableContext {
    pub description: String,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionAvailability {
    #[default]
    Enabled,
    /// Registered for rendering only, never offered to the model
    Disabled,
    /// Executed by a remote endpoint on the server side
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionParameter {
    pub name: String,
    #[serde(rename = "type", default = "default_parameter_type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

fn default_parameter_type() -> String {
    "string".to_string()
}

/// An action the assistant can trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,
    #[serde(default)]
    pub available: ActionAvailability,
}

impl ActionDefinition {
    /// Client actions reach the model only when enabled; remote ones are
    /// added by the runtime from the endpoint's own info
    pub fn is_offered_to_model(&self) -> bool {
        self.available == ActionAvailability::Enabled
    }

    /// JSON schema of the parameters in function-calling format
    pub fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                json!({ "type": param.kind, "description": param.description }),
            );
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Folds the readables into a single leading system message
pub fn context_message(context: &[ReadableContext]) -> Option<ChatMessage> {
    if context.is_empty() {
        return None;
    }
    let mut text = String::from("The user has provided you with the following context:\n");
    for item in context {
        let value = serde_json::to_string(&item.value).unwrap_or_else(|_| item.value.to_string());
        text.push_str(&format!("\n{}:\n{}\n", item.description, value));
    }
    Some(ChatMessage::system(text))
}

/// One frame of the runtime's event stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CopilotEvent {
    TextDelta {
        content: String,
    },
    ToolCall {
        id: String,
        name: String,
        arguments: String,
    },
    ActionResult {
        tool_call_id: String,
        name: String,
        result: Value,
    },
    AgentState {
        agent: String,
        state: Value,
    },
    Error {
        message: String,
    },
    Done {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thread_id: Option<String>,
    },
}

impl CopilotEvent {
    /// SSE event name the frame is sent under
    pub fn name(&self) -> &'static str {
        match self {
            CopilotEvent::TextDelta { .. } => "text_delta",
            CopilotEvent::ToolCall { .. } => "tool_call",
            CopilotEvent::ActionResult { .. } => "action_result",
            CopilotEvent::AgentState { .. } => "agent_state",
            CopilotEvent::Error { .. } => "error",
            CopilotEvent::Done { .. } => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// What a remote endpoint (and the runtime as a whole) advertises
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
    #[serde(default)]
    pub agents: Vec<AgentInfo>,
}

/// `POST {remote}/actions/execute`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteActionRequest {
    pub name: String,
    pub arguments: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteActionResponse {
    pub result: Value,
}

/// `POST {remote}/agents/execute`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteAgentRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
    #[serde(default)]
    pub context: Vec<ReadableContext>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_action() -> ActionDefinition {
        ActionDefinition {
            name: "searchInternet".to_string(),
            description: "Searches the internet for information.".to_string(),
            parameters: vec![ActionParameter {
                name: "query".to_string(),
                kind: "string".to_string(),
                description: "The query to search the internet for.".to_string(),
                required: true,
            }],
            available: ActionAvailability::Disabled,
        }
    }

    #[test]
    fn test_parameters_schema() {
        let schema = search_action().parameters_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(schema["required"], json!(["query"]));
    }

    #[test]
    fn test_only_enabled_actions_offered() {
        let mut action = search_action();
        assert!(!action.is_offered_to_model());
        action.available = ActionAvailability::Remote;
        assert!(!action.is_offered_to_model());
        action.available = ActionAvailability::Enabled;
        assert!(action.is_offered_to_model());
    }

    #[test]
    fn test_request_defaults() {
        let request: CopilotRequest =
            serde_json::from_str(r#"{"messages":[{"role":"user","content":"hi"}]}"#).unwrap();
        assert!(request.actions.is_empty());
        assert!(request.context.is_empty());
        assert!(request.agent.is_none());
    }

    #[test]
    fn test_context_message() {
        assert!(context_message(&[]).is_none());

        let msg = context_message(&[ReadableContext {
            description: "Dashboard data".to_string(),
            value: json!({"metrics": {"totalRevenue": 100}}),
        }])
        .unwrap();
        assert!(msg.content.contains("Dashboard data:"));
        assert!(msg.content.contains("\"totalRevenue\":100"));
    }

    #[test]
    fn test_event_tagging() {
        let event = CopilotEvent::TextDelta {
            content: "Hi".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, json!({"type": "text_delta", "content": "Hi"}));
        assert_eq!(event.name(), "text_delta");

        let done: CopilotEvent = serde_json::from_str(r#"{"type":"done"}"#).unwrap();
        assert_eq!(done, CopilotEvent::Done { thread_id: None });
    }
}
