//! Shared application state handed to every handler

use std::sync::Arc;

use crate::copilot::CopilotRuntime;

#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<CopilotRuntime>,
}

impl AppState {
    pub fn new(runtime: CopilotRuntime) -> Self {
        Self {
            runtime: Arc::new(runtime),
        }
    }
}
