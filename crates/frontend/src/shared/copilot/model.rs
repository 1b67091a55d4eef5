//! Copilot runtime client (API functions)

use crate::shared::api_utils::api_url;
use contracts::shared::copilot::{parse_event_stream, CopilotEvent, CopilotRequest};
use gloo_net::http::Request;

pub const RUNTIME_PATH: &str = "/api/copilotkit";

/// Sends one turn and returns the events of the streamed response
pub async fn send_turn(request: &CopilotRequest) -> Result<Vec<CopilotEvent>, String> {
    let response = Request::post(&api_url(RUNTIME_PATH))
        .header("Accept", "text/event-stream")
        .json(request)
        .map_err(|e| format!("Failed to encode request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))?;

    Ok(parse_event_stream(&body))
}
