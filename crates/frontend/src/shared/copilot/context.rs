//! Page-wide copilot registry: what the assistant can read and which
//! actions it can trigger, plus the running chat thread.

use std::sync::Arc;

use contracts::shared::copilot::{ActionDefinition, ChatMessage, ReadableContext};
use leptos::prelude::*;
use serde_json::Value;

/// Render state handed to an action's render callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    InProgress,
    Complete,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::InProgress => "inProgress",
            ActionStatus::Complete => "complete",
        }
    }
}

pub type ActionRender = Arc<dyn Fn(Value, ActionStatus) -> AnyView + Send + Sync>;

#[derive(Clone)]
struct ReadableEntry {
    id: u64,
    description: String,
    value: Signal<Value>,
}

#[derive(Clone)]
pub struct RegisteredAction {
    id: u64,
    pub definition: ActionDefinition,
    pub render: Option<ActionRender>,
}

#[derive(Clone, Copy)]
pub struct CopilotContext {
    readables: RwSignal<Vec<ReadableEntry>>,
    actions: RwSignal<Vec<RegisteredAction>>,
    next_id: StoredValue<u64>,
    pub thread_id: RwSignal<Option<String>>,
    pub messages: RwSignal<Vec<ChatMessage>>,
    pub is_sending: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    /// Last state reported by a remote agent
    pub agent_state: RwSignal<Option<(String, Value)>>,
}

impl CopilotContext {
    pub fn new() -> Self {
        Self {
            readables: RwSignal::new(Vec::new()),
            actions: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
            thread_id: RwSignal::new(None),
            messages: RwSignal::new(Vec::new()),
            is_sending: RwSignal::new(false),
            error: RwSignal::new(None),
            agent_state: RwSignal::new(None),
        }
    }

    fn allocate_id(&self) -> u64 {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        id
    }

    pub fn register_readable(&self, description: String, value: Signal<Value>) -> u64 {
        let id = self.allocate_id();
        self.readables.update(|r| {
            r.push(ReadableEntry {
                id,
                description,
                value,
            })
        });
        id
    }

    pub fn unregister_readable(&self, id: u64) {
        self.readables.update(|r| r.retain(|e| e.id != id));
    }

    pub fn register_action(
        &self,
        definition: ActionDefinition,
        render: Option<ActionRender>,
    ) -> u64 {
        let id = self.allocate_id();
        // a later registration under the same name wins
        self.actions.update(|a| {
            a.retain(|existing| existing.definition.name != definition.name);
            a.push(RegisteredAction {
                id,
                definition,
                render,
            });
        });
        id
    }

    pub fn unregister_action(&self, id: u64) {
        self.actions.update(|a| a.retain(|e| e.id != id));
    }

    /// Current values of all readables, read without tracking
    pub fn readable_context(&self) -> Vec<ReadableContext> {
        self.readables.with_untracked(|r| {
            r.iter()
                .map(|e| ReadableContext {
                    description: e.description.clone(),
                    value: e.value.get_untracked(),
                })
                .collect()
        })
    }

    /// Actions sent with a turn: everything the model may call
    pub fn offered_actions(&self) -> Vec<ActionDefinition> {
        self.actions.with_untracked(|a| {
            a.iter()
                .filter(|e| e.definition.is_offered_to_model())
                .map(|e| e.definition.clone())
                .collect()
        })
    }

    pub fn action(&self, name: &str) -> Option<RegisteredAction> {
        self.actions
            .with(|a| a.iter().find(|e| e.definition.name == name).cloned())
    }

    pub fn reset_thread(&self) {
        self.thread_id.set(None);
        self.messages.set(Vec::new());
        self.error.set(None);
        self.agent_state.set(None);
    }
}

impl Default for CopilotContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_copilot() -> CopilotContext {
    expect_context::<CopilotContext>()
}

/// Exposes `value` to the assistant while the calling component is alive
pub fn use_copilot_readable(description: impl Into<String>, value: Signal<Value>) {
    let ctx = use_copilot();
    let id = ctx.register_readable(description.into(), value);
    on_cleanup(move || ctx.unregister_readable(id));
}

/// Registers an action while the calling component is alive
pub fn use_copilot_action(definition: ActionDefinition, render: Option<ActionRender>) {
    let ctx = use_copilot();
    let id = ctx.register_action(definition, render);
    on_cleanup(move || ctx.unregister_action(id));
}
