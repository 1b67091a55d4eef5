//! Copilot chat sidebar

use super::context::{use_copilot, ActionStatus, CopilotContext};
use super::model::send_turn;
use super::view_model::{
    agent_status_line, apply_event, has_tool_result, needs_follow_up, parse_arguments,
    EventEffect, MAX_FOLLOW_UPS,
};
use crate::shared::icons::icon;
use contracts::shared::copilot::{ChatMessage, ChatRole, CopilotEvent, CopilotRequest, ToolCall};
use leptos::prelude::*;
use thaw::*;

const RENDERED_RESULT: &str = "Rendered in the chat";

#[derive(Clone, Copy)]
struct SidebarVm {
    open: RwSignal<bool>,
    input: RwSignal<String>,
}

impl SidebarVm {
    fn new(default_open: bool) -> Self {
        Self {
            open: RwSignal::new(default_open),
            input: RwSignal::new(String::new()),
        }
    }
}

/// Result recorded for a client-side tool call so the next turn stays valid
fn client_tool_result(ctx: &CopilotContext, call: &ToolCall) -> String {
    match ctx.action(&call.name) {
        Some(_) => RENDERED_RESULT.to_string(),
        None => format!("Action {} is not available on this page", call.name),
    }
}

fn turn_request(ctx: &CopilotContext) -> CopilotRequest {
    let request = CopilotRequest {
        thread_id: ctx.thread_id.get_untracked(),
        messages: ctx.messages.get_untracked(),
        actions: ctx.offered_actions(),
        context: ctx.readable_context(),
        agent: None,
    };
    log::debug!(
        "copilot turn: {} messages, {} actions, {} readables",
        request.messages.len(),
        request.actions.len(),
        request.context.len()
    );
    request
}

fn apply_events(ctx: CopilotContext, events: Vec<CopilotEvent>) {
    for event in events {
        let mut effect = EventEffect::None;
        ctx.messages.update(|m| effect = apply_event(m, event));
        match effect {
            EventEffect::None => {}
            EventEffect::ClientToolCall(call) => {
                let result = client_tool_result(&ctx, &call);
                ctx.messages
                    .update(|m| m.push(ChatMessage::tool_result(call.id, result)));
            }
            EventEffect::AgentState { agent, state } => {
                ctx.agent_state.set(Some((agent, state)));
            }
            EventEffect::Error(message) => {
                log::error!("copilot runtime error: {}", message);
                ctx.error.set(Some(message));
            }
            EventEffect::Done(thread_id) => {
                if thread_id.is_some() {
                    ctx.thread_id.set(thread_id);
                }
            }
        }
    }
}

fn send(ctx: CopilotContext, content: String) {
    if content.trim().is_empty() || ctx.is_sending.get_untracked() {
        return;
    }

    let user_message = ChatMessage::user(content);
    let optimistic_id = user_message.id.clone();
    ctx.messages.update(|m| m.push(user_message));
    ctx.is_sending.set(true);
    ctx.error.set(None);
    ctx.agent_state.set(None);

    wasm_bindgen_futures::spawn_local(async move {
        for round in 0..=MAX_FOLLOW_UPS {
            let request = turn_request(&ctx);
            match send_turn(&request).await {
                Ok(events) => {
                    let follow_up = needs_follow_up(&events);
                    apply_events(ctx, events);
                    if !follow_up {
                        break;
                    }
                    if round == MAX_FOLLOW_UPS {
                        log::warn!("copilot follow-up limit reached");
                    }
                }
                Err(e) => {
                    log::error!("copilot request failed: {}", e);
                    if round == 0 {
                        ctx.messages.update(|m| m.retain(|msg| msg.id != optimistic_id));
                    }
                    ctx.error.set(Some(e));
                    break;
                }
            }
        }
        ctx.is_sending.set(false);
    });
}

fn tool_call_view(ctx: CopilotContext, call: ToolCall) -> AnyView {
    let render = ctx.action(&call.name).and_then(|a| a.render);
    match render {
        Some(render) => {
            let args = parse_arguments(&call.arguments);
            let id = call.id.clone();
            (move || {
                let status = if ctx.messages.with(|m| has_tool_result(m, &id)) {
                    ActionStatus::Complete
                } else {
                    ActionStatus::InProgress
                };
                render(args.clone(), status)
            })
            .into_any()
        }
        None => view! {
            <div class="copilot-tool-chip">
                {icon("sparkle")}
                <span>{call.name}</span>
            </div>
        }
        .into_any(),
    }
}

fn message_view(ctx: CopilotContext, msg: ChatMessage) -> AnyView {
    match msg.role {
        ChatRole::User => view! {
            <div class="copilot-message copilot-message--user">{msg.content}</div>
        }
        .into_any(),
        ChatRole::Assistant if msg.has_tool_calls() => msg
            .tool_calls
            .into_iter()
            .map(|call| tool_call_view(ctx, call))
            .collect_view()
            .into_any(),
        ChatRole::Assistant => view! {
            <div class="copilot-message copilot-message--assistant">{msg.content}</div>
        }
        .into_any(),
        ChatRole::System | ChatRole::Tool => ().into_any(),
    }
}

#[component]
pub fn CopilotSidebar(
    #[prop(into)] title: String,
    #[prop(into)] initial: String,
    #[prop(optional)] default_open: bool,
) -> impl IntoView {
    let ctx = use_copilot();
    let vm = SidebarVm::new(default_open);
    let messages_ref = NodeRef::<leptos::html::Div>::new();

    // keep the newest message in view
    Effect::new(move |_| {
        ctx.messages.track();
        if let Some(container) = messages_ref.get() {
            request_animation_frame(move || {
                container.set_scroll_top(container.scroll_height());
            });
        }
    });

    let handle_send = Callback::new(move |_: ()| {
        let content = vm.input.get_untracked();
        if content.trim().is_empty() {
            return;
        }
        vm.input.set(String::new());
        send(ctx, content);
    });

    view! {
        <aside class=move || {
            if vm.open.get() { "copilot-sidebar copilot-sidebar--open" } else { "copilot-sidebar" }
        }>
            <button
                class="copilot-sidebar__toggle"
                title=title.clone()
                on:click=move |_| vm.open.update(|o| *o = !*o)
            >
                {move || if vm.open.get() { icon("close") } else { icon("sparkle") }}
            </button>

            <Show when=move || vm.open.get()>
                <div class="copilot-sidebar__panel">
                    <div class="copilot-sidebar__header">
                        <h2>{title.clone()}</h2>
                        <Button
                            appearance=ButtonAppearance::Subtle
                            size=ButtonSize::Small
                            disabled=ctx.is_sending
                            on_click=move |_| ctx.reset_thread()
                        >
                            "New chat"
                        </Button>
                    </div>

                    {move || {
                        ctx.error
                            .get()
                            .map(|e| view! { <div class="copilot-sidebar__error">{e}</div> })
                    }}

                    <div node_ref=messages_ref class="copilot-sidebar__messages">
                        <div class="copilot-message copilot-message--assistant">
                            {initial.clone()}
                        </div>
                        <For
                            each=move || ctx.messages.get()
                            key=|msg| format!("{}:{}", msg.id, msg.content.len())
                            let:msg
                        >
                            {message_view(ctx, msg)}
                        </For>
                        <Show when=move || ctx.is_sending.get()>
                            {move || {
                                ctx.agent_state
                                    .get()
                                    .map(|(agent, state)| {
                                        view! {
                                            <div class="copilot-agent-state">
                                                {icon("sparkle")}
                                                <span>{agent_status_line(&agent, &state)}</span>
                                            </div>
                                        }
                                    })
                            }}
                            <div class="copilot-message copilot-message--assistant copilot-typing">
                                "..."
                            </div>
                        </Show>
                    </div>

                    <div class="copilot-sidebar__input">
                        <div style="flex: 1;">
                            <Textarea
                                value=vm.input
                                placeholder="Ask about your data... (Ctrl+Enter to send)"
                                attr:style="width: 100%; min-height: 60px; max-height: 160px; resize: vertical;"
                                disabled=ctx.is_sending
                                on:keydown=move |ev: web_sys::KeyboardEvent| {
                                    if ev.key() == "Enter" && ev.ctrl_key() {
                                        ev.prevent_default();
                                        handle_send.run(());
                                    }
                                }
                            />
                        </div>
                        <Button
                            appearance=ButtonAppearance::Primary
                            disabled=ctx.is_sending
                            on_click=move |_| handle_send.run(())
                        >
                            {icon("send")}
                        </Button>
                    </div>
                </div>
            </Show>
        </aside>
    }
}
