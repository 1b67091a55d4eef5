//! Copilot integration on the page
//!
//! - context.rs: registry of readables/actions and the chat thread
//! - view_model.rs: folding runtime events into the thread
//! - model.rs: runtime client
//! - sidebar.rs: chat panel

pub mod context;
pub mod model;
pub mod sidebar;
pub mod view_model;

pub use context::{
    use_copilot, use_copilot_action, use_copilot_readable, ActionRender, ActionStatus,
    CopilotContext,
};
pub use sidebar::CopilotSidebar;
