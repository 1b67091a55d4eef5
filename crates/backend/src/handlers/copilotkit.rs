use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use contracts::shared::copilot::{CopilotEvent, CopilotRequest, RuntimeInfo};
use futures::{Stream, StreamExt};

use crate::state::AppState;

/// POST /api/copilotkit
///
/// Any body that does not decode as a request is a 400, including bodies
/// axum would otherwise answer with 415 or 422.
pub async fn handle(
    State(state): State<AppState>,
    payload: Result<Json<CopilotRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, (StatusCode, String)> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!("Rejected copilot request: {}", rejection.body_text());
        (StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    tracing::info!(
        thread_id = request.thread_id.as_deref().unwrap_or("-"),
        agent = request.agent.as_deref().unwrap_or("-"),
        messages = request.messages.len(),
        actions = request.actions.len(),
        readables = request.context.len(),
        "copilot request"
    );

    let events = state
        .runtime
        .clone()
        .handle(request)
        .map(|event| Ok(to_sse_event(&event)));

    Ok(Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    ))
}

/// GET /api/copilotkit/info
pub async fn info(State(state): State<AppState>) -> Json<RuntimeInfo> {
    Json(state.runtime.info().await)
}

fn to_sse_event(event: &CopilotEvent) -> Event {
    match Event::default().event(event.name()).json_data(event) {
        Ok(ev) => ev,
        Err(e) => {
            tracing::error!("Failed to encode copilot event: {}", e);
            Event::default()
                .event("error")
                .data(r#"{"type":"error","message":"failed to encode event"}"#)
        }
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::copilot::service_adapter::tests::ScriptedProvider;
    use crate::copilot::{CopilotRuntime, SanitizingAdapter};
    use crate::routes::configure_routes;
    use crate::shared::llm::LlmChunk;

    async fn spawn_app() -> String {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(LlmChunk::Text(
            "Hello".to_string(),
        ))]));
        let state = AppState::new(CopilotRuntime::new(SanitizingAdapter::new(provider), vec![]));
        let app = configure_routes(state, "/api/copilotkit");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/copilotkit", addr)
    }

    async fn post(url: &str, content_type: &str, body: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(url)
            .header("content-type", content_type)
            .body(body.to_string())
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_undecodable_bodies_are_bad_requests() {
        let url = spawn_app().await;

        let missing_messages = post(&url, "application/json", r#"{"threadId":"t1"}"#).await;
        assert_eq!(missing_messages.status(), 400);

        let malformed = post(&url, "application/json", "{\"messages\": [").await;
        assert_eq!(malformed.status(), 400);

        let not_json = post(&url, "text/plain", r#"{"messages":[]}"#).await;
        assert_eq!(not_json.status(), 400);
    }

    #[tokio::test]
    async fn test_valid_request_streams_events() {
        let url = spawn_app().await;
        let response = post(
            &url,
            "application/json",
            r#"{"messages":[{"role":"user","content":"hi"}]}"#,
        )
        .await;
        assert_eq!(response.status(), 200);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));

        let body = response.text().await.unwrap();
        assert!(body.contains("event: text_delta"));
        assert!(body.contains("event: done"));
    }
}
