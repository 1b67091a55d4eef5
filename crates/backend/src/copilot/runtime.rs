//! The copilot runtime: turns a [`CopilotRequest`] into a stream of
//! [`CopilotEvent`]s, either through the model or through a remote agent.

use std::collections::HashMap;
use std::sync::Arc;

use contracts::shared::copilot::{
    context_message, ActionDefinition, AgentInfo, CopilotEvent, CopilotRequest,
    ExecuteAgentRequest, RuntimeInfo,
};
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use super::error::RuntimeError;
use super::remote::RemoteEndpoint;
use super::service_adapter::SanitizingAdapter;
use crate::shared::llm::{ChatMessage, LlmChunk, ToolCall, ToolDefinition};

const EVENT_BUFFER: usize = 64;

pub struct CopilotRuntime {
    adapter: SanitizingAdapter,
    remotes: Vec<RemoteEndpoint>,
}

impl CopilotRuntime {
    pub fn new(adapter: SanitizingAdapter, remotes: Vec<RemoteEndpoint>) -> Self {
        Self { adapter, remotes }
    }

    /// Merged info of all remote endpoints; unreachable ones are skipped
    pub async fn info(&self) -> RuntimeInfo {
        let mut merged = RuntimeInfo::default();
        for (_, info) in self.remote_infos().await {
            merged.actions.extend(info.actions);
            merged.agents.extend(info.agents);
        }
        merged
    }

    async fn remote_infos(&self) -> Vec<(&RemoteEndpoint, RuntimeInfo)> {
        let mut infos = Vec::with_capacity(self.remotes.len());
        for remote in &self.remotes {
            match remote.info().await {
                Ok(info) => infos.push((remote, info)),
                Err(e) => tracing::warn!("Remote endpoint {} skipped: {}", remote.url(), e),
            }
        }
        infos
    }

    /// Runs the turn in a background task. The stream always ends with
    /// `done`; a failure shows up as one `error` event right before it.
    pub fn handle(self: Arc<Self>, request: CopilotRequest) -> ReceiverStream<CopilotEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);

        tokio::spawn(async move {
            let thread_id = request
                .thread_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string());

            let result = match request.agent.clone() {
                Some(agent) => self.run_agent(&agent, &thread_id, &request, &tx).await,
                None => self.run_model(&thread_id, &request, &tx).await,
            };

            match result {
                Ok(()) => {}
                Err(RuntimeError::ClientDisconnected) => {
                    tracing::info!("Thread {} abandoned by client", thread_id);
                    return;
                }
                Err(e) => {
                    tracing::error!("Copilot turn failed for thread {}: {}", thread_id, e);
                    let _ = tx
                        .send(CopilotEvent::Error {
                            message: e.to_string(),
                        })
                        .await;
                }
            }
            let _ = tx
                .send(CopilotEvent::Done {
                    thread_id: Some(thread_id),
                })
                .await;
        });

        ReceiverStream::new(rx)
    }

    async fn run_model(
        &self,
        thread_id: &str,
        request: &CopilotRequest,
        tx: &mpsc::Sender<CopilotEvent>,
    ) -> Result<(), RuntimeError> {
        let remote_infos = self.remote_infos().await;

        // tool name -> endpoint that serves it
        let mut remote_actions: HashMap<String, &RemoteEndpoint> = HashMap::new();
        let mut remote_agents: HashMap<String, &RemoteEndpoint> = HashMap::new();
        let mut tools: Vec<ToolDefinition> = request
            .actions
            .iter()
            .filter(|a| a.is_offered_to_model())
            .map(tool_definition)
            .collect();
        for (remote, info) in &remote_infos {
            for action in &info.actions {
                remote_actions.insert(action.name.clone(), *remote);
                tools.push(tool_definition(action));
            }
            for agent in &info.agents {
                remote_agents.insert(agent.name.clone(), *remote);
                tools.push(agent_tool_definition(agent));
            }
        }

        let mut messages: Vec<ChatMessage> = Vec::with_capacity(request.messages.len() + 1);
        messages.extend(context_message(&request.context));
        messages.extend(request.messages.iter().cloned());

        let mut chunks = self.adapter.process(messages, tools).await?;
        while let Some(chunk) = chunks.next().await {
            match chunk? {
                LlmChunk::Text(content) => send(tx, CopilotEvent::TextDelta { content }).await?,
                LlmChunk::ToolCall(call) => {
                    if let Some(remote) = remote_actions.get(&call.name) {
                        execute_remote_action(remote, call, tx).await?
                    } else if let Some(remote) = remote_agents.get(&call.name) {
                        delegate(remote, &call.name, thread_id, request, tx).await?
                    } else {
                        send(
                            tx,
                            CopilotEvent::ToolCall {
                                id: call.id,
                                name: call.name,
                                arguments: call.arguments,
                            },
                        )
                        .await?
                    }
                }
            }
        }
        Ok(())
    }

    async fn run_agent(
        &self,
        agent: &str,
        thread_id: &str,
        request: &CopilotRequest,
        tx: &mpsc::Sender<CopilotEvent>,
    ) -> Result<(), RuntimeError> {
        let remote = self
            .remote_infos()
            .await
            .into_iter()
            .find(|(_, info)| info.agents.iter().any(|a| a.name == agent))
            .map(|(remote, _)| remote.clone())
            .ok_or_else(|| RuntimeError::UnknownAgent(agent.to_string()))?;

        delegate(&remote, agent, thread_id, request, tx).await
    }
}

/// Hands the whole thread to a remote agent and relays what it streams
async fn delegate(
    remote: &RemoteEndpoint,
    agent: &str,
    thread_id: &str,
    request: &CopilotRequest,
    tx: &mpsc::Sender<CopilotEvent>,
) -> Result<(), RuntimeError> {
    tracing::info!("Delegating thread {} to agent {} at {}", thread_id, agent, remote.url());

    let agent_request = ExecuteAgentRequest {
        name: agent.to_string(),
        thread_id: Some(thread_id.to_string()),
        messages: request.messages.clone(),
        actions: request.actions.clone(),
        context: request.context.clone(),
    };
    let mut lines = remote.execute_agent(&agent_request).await?;
    while let Some(line) = lines.next().await {
        send(tx, agent_event(agent, line?)).await?;
    }
    Ok(())
}

async fn execute_remote_action(
    remote: &RemoteEndpoint,
    call: ToolCall,
    tx: &mpsc::Sender<CopilotEvent>,
) -> Result<(), RuntimeError> {
    let arguments: Value = serde_json::from_str(&call.arguments).unwrap_or(Value::Null);
    tracing::info!("Executing remote action {} at {}", call.name, remote.url());
    let result = remote.execute_action(&call.name, arguments).await?;
    send(
        tx,
        CopilotEvent::ActionResult {
            tool_call_id: call.id,
            name: call.name,
            result,
        },
    )
    .await
}

async fn send(tx: &mpsc::Sender<CopilotEvent>, event: CopilotEvent) -> Result<(), RuntimeError> {
    tx.send(event)
        .await
        .map_err(|_| RuntimeError::ClientDisconnected)
}

fn tool_definition(action: &ActionDefinition) -> ToolDefinition {
    ToolDefinition {
        name: action.name.clone(),
        description: action.description.clone(),
        parameters: action.parameters_schema(),
    }
}

/// An agent is offered to the model as a tool without parameters; calling
/// it hands the conversation over
fn agent_tool_definition(agent: &AgentInfo) -> ToolDefinition {
    let description = if agent.description.is_empty() {
        format!("Hand the conversation to the {} agent", agent.name)
    } else {
        agent.description.clone()
    };
    ToolDefinition {
        name: agent.name.clone(),
        description,
        parameters: json!({ "type": "object", "properties": {}, "required": [] }),
    }
}

/// Agents may emit runtime events directly; anything else is agent state
fn agent_event(agent: &str, line: Value) -> CopilotEvent {
    match serde_json::from_value::<CopilotEvent>(line.clone()) {
        // the runtime owns the terminal frame
        Ok(CopilotEvent::Done { .. }) => CopilotEvent::AgentState {
            agent: agent.to_string(),
            state: line,
        },
        Ok(event) => event,
        Err(_) => CopilotEvent::AgentState {
            agent: agent.to_string(),
            state: line,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copilot::service_adapter::tests::ScriptedProvider;
    use contracts::shared::copilot::{
        ActionAvailability, ActionParameter, ChatRole, ReadableContext,
    };
    use serde_json::json;

    fn runtime_with(provider: Arc<ScriptedProvider>) -> Arc<CopilotRuntime> {
        Arc::new(CopilotRuntime::new(SanitizingAdapter::new(provider), vec![]))
    }

    fn action(name: &str, available: ActionAvailability) -> ActionDefinition {
        ActionDefinition {
            name: name.to_string(),
            description: String::new(),
            parameters: vec![ActionParameter {
                name: "query".to_string(),
                kind: "string".to_string(),
                description: String::new(),
                required: true,
            }],
            available,
        }
    }

    #[tokio::test]
    async fn test_model_turn_streams_text_and_tool_calls() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(LlmChunk::Text("Revenue is ".to_string())),
            Ok(LlmChunk::Text("up.".to_string())),
            Ok(LlmChunk::ToolCall(ToolCall {
                id: "call_1".to_string(),
                name: "highlightChart".to_string(),
                arguments: "{\"query\":\"sales\"}".to_string(),
            })),
        ]));
        let runtime = runtime_with(provider.clone());

        let request = CopilotRequest {
            thread_id: Some("t1".to_string()),
            messages: vec![ChatMessage::user("How are we doing?"), ChatMessage::assistant("")],
            actions: vec![
                action("highlightChart", ActionAvailability::Enabled),
                action("searchInternet", ActionAvailability::Disabled),
            ],
            context: vec![ReadableContext {
                description: "Dashboard data".to_string(),
                value: json!({"metrics": {"totalRevenue": 100}}),
            }],
            agent: None,
        };

        let events: Vec<CopilotEvent> = runtime.handle(request).collect().await;
        assert_eq!(
            events,
            vec![
                CopilotEvent::TextDelta {
                    content: "Revenue is ".to_string()
                },
                CopilotEvent::TextDelta {
                    content: "up.".to_string()
                },
                CopilotEvent::ToolCall {
                    id: "call_1".to_string(),
                    name: "highlightChart".to_string(),
                    arguments: "{\"query\":\"sales\"}".to_string(),
                },
                CopilotEvent::Done {
                    thread_id: Some("t1".to_string())
                },
            ]
        );

        let received = provider.received.lock().unwrap();
        let (messages, tools) = &received[0];
        // context first, then the thread with the empty message sanitized
        assert_eq!(messages[0].role, ChatRole::System);
        assert!(messages[0].content.contains("Dashboard data"));
        assert_eq!(messages[2].content, " ");
        // disabled actions are render-only
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "highlightChart");
    }

    #[tokio::test]
    async fn test_model_error_becomes_error_event() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(LlmChunk::Text("Par".to_string())),
            Err("ValidationException".to_string()),
            Ok(LlmChunk::Text("never sent".to_string())),
        ]));
        let runtime = runtime_with(provider);

        let request = CopilotRequest {
            messages: vec![ChatMessage::user("hi")],
            ..Default::default()
        };
        let events: Vec<CopilotEvent> = runtime.handle(request).collect().await;
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[1],
            CopilotEvent::Error {
                message: "API error: ValidationException".to_string()
            }
        );
        assert!(matches!(events[2], CopilotEvent::Done { thread_id: Some(_) }));
    }

    const AGENT: &str = "insight_copilot_agent";

    /// Remote endpoint with one agent on an ephemeral port
    async fn spawn_agent_remote() -> RemoteEndpoint {
        use axum::{routing::post, Json, Router};

        let app = Router::new()
            .route(
                "/copilotkit/info",
                post(|| async {
                    Json(json!({
                        "actions": [],
                        "agents": [{
                            "name": AGENT,
                            "description": "A copilot agent that can extract insights from the Sakila database"
                        }]
                    }))
                }),
            )
            .route(
                "/copilotkit/agents/execute",
                post(|| async {
                    concat!(
                        "{\"progress\":\"Running query...\"}\n",
                        "{\"type\":\"text_delta\",\"content\":\"Top film: BUCKET BROTHERHOOD\"}\n",
                    )
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        RemoteEndpoint::new(format!("http://{}/copilotkit", addr), reqwest::Client::new())
    }

    fn agent_relay_events() -> Vec<CopilotEvent> {
        vec![
            CopilotEvent::AgentState {
                agent: AGENT.to_string(),
                state: json!({"progress": "Running query..."}),
            },
            CopilotEvent::TextDelta {
                content: "Top film: BUCKET BROTHERHOOD".to_string(),
            },
            CopilotEvent::Done {
                thread_id: Some("t7".to_string()),
            },
        ]
    }

    #[tokio::test]
    async fn test_remote_agent_offered_as_tool_and_delegated() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(LlmChunk::ToolCall(ToolCall {
            id: "call_agent".to_string(),
            name: AGENT.to_string(),
            arguments: "{}".to_string(),
        }))]));
        let remote = spawn_agent_remote().await;
        let runtime = Arc::new(CopilotRuntime::new(
            SanitizingAdapter::new(provider.clone()),
            vec![remote],
        ));

        let request = CopilotRequest {
            thread_id: Some("t7".to_string()),
            messages: vec![ChatMessage::user("Which film earns the most?")],
            ..Default::default()
        };
        let events: Vec<CopilotEvent> = runtime.handle(request).collect().await;
        assert_eq!(events, agent_relay_events());

        let received = provider.received.lock().unwrap();
        let (_, tools) = &received[0];
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, AGENT);
        assert!(tools[0].description.contains("Sakila"));
        assert_eq!(tools[0].parameters["properties"], json!({}));
    }

    #[tokio::test]
    async fn test_explicit_agent_skips_model() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let remote = spawn_agent_remote().await;
        let runtime = Arc::new(CopilotRuntime::new(
            SanitizingAdapter::new(provider.clone()),
            vec![remote],
        ));

        let request = CopilotRequest {
            thread_id: Some("t7".to_string()),
            messages: vec![ChatMessage::user("Which film earns the most?")],
            agent: Some(AGENT.to_string()),
            ..Default::default()
        };
        let events: Vec<CopilotEvent> = runtime.handle(request).collect().await;
        assert_eq!(events, agent_relay_events());
        assert!(provider.received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_agent() {
        let runtime = runtime_with(Arc::new(ScriptedProvider::new(vec![])));
        let request = CopilotRequest {
            messages: vec![ChatMessage::user("hi")],
            agent: Some("insight_copilot_agent".to_string()),
            ..Default::default()
        };
        let events: Vec<CopilotEvent> = runtime.handle(request).collect().await;
        assert_eq!(
            events[0],
            CopilotEvent::Error {
                message: "agent 'insight_copilot_agent' is not provided by any remote endpoint"
                    .to_string()
            }
        );
    }

    #[test]
    fn test_agent_event_mapping() {
        let passthrough = agent_event("a", json!({"type": "text_delta", "content": "x"}));
        assert_eq!(
            passthrough,
            CopilotEvent::TextDelta {
                content: "x".to_string()
            }
        );

        let state = agent_event("a", json!({"step": "query_db"}));
        assert!(matches!(state, CopilotEvent::AgentState { agent, .. } if agent == "a"));

        let done = agent_event("a", json!({"type": "done"}));
        assert!(matches!(done, CopilotEvent::AgentState { .. }));
    }
}
