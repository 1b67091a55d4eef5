//! Client for remote agent/tool backends the runtime delegates to.

use contracts::shared::copilot::{
    ActionAvailability, ExecuteActionRequest, ExecuteActionResponse, ExecuteAgentRequest,
    RuntimeInfo,
};
use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::Value;
use std::collections::VecDeque;
use std::time::Duration;

use super::error::RemoteError;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client shared by all remote endpoints
pub fn http_client(connect_timeout: Duration) -> Result<reqwest::Client, RemoteError> {
    Ok(reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .build()?)
}

/// One configured remote endpoint, e.g. `http://localhost:8000/copilotkit`
#[derive(Clone)]
pub struct RemoteEndpoint {
    url: String,
    client: reqwest::Client,
    /// Bounds `/info` and action calls; agent streams run as long as the agent does
    request_timeout: Duration,
}

impl RemoteEndpoint {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            client,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response, RemoteError> {
        let url = format!("{}{}", self.url, path);
        let mut request = self.client.post(&url).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(RemoteError::Status {
                url,
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }

    /// Actions and agents the endpoint provides. Actions are marked remote.
    pub async fn info(&self) -> Result<RuntimeInfo, RemoteError> {
        let response = self.post("/info", &serde_json::json!({}), Some(self.request_timeout))
            .await?;
        let bytes = response.bytes().await?;
        let mut info: RuntimeInfo = serde_json::from_slice(&bytes)?;
        for action in &mut info.actions {
            action.available = ActionAvailability::Remote;
        }
        Ok(info)
    }

    pub async fn execute_action(&self, name: &str, arguments: Value) -> Result<Value, RemoteError> {
        let request = ExecuteActionRequest {
            name: name.to_string(),
            arguments,
        };
        let response = self
            .post("/actions/execute", &request, Some(self.request_timeout))
            .await?;
        let bytes = response.bytes().await?;
        let body: ExecuteActionResponse = serde_json::from_slice(&bytes)?;
        Ok(body.result)
    }

    /// Runs an agent; its answer is newline-delimited JSON, one value per line
    pub async fn execute_agent(
        &self,
        request: &ExecuteAgentRequest,
    ) -> Result<BoxStream<'static, Result<Value, RemoteError>>, RemoteError> {
        let response = self.post("/agents/execute", request, None).await?;
        let body = response.bytes_stream().boxed();

        let ready: VecDeque<Result<Value, RemoteError>> = VecDeque::new();
        let state = (body, LineBuffer::default(), ready, false);
        let stream = futures::stream::unfold(
            state,
            |(mut body, mut lines, mut ready, mut finished)| async move {
                loop {
                    if let Some(item) = ready.pop_front() {
                        return Some((item, (body, lines, ready, finished)));
                    }
                    if finished {
                        return None;
                    }
                    match body.next().await {
                        Some(Ok(chunk)) => {
                            for line in lines.push(&chunk) {
                                ready.push_back(serde_json::from_str(&line).map_err(RemoteError::from));
                            }
                        }
                        Some(Err(e)) => {
                            finished = true;
                            ready.push_back(Err(RemoteError::from(e)));
                        }
                        None => {
                            finished = true;
                            if let Some(line) = lines.finish() {
                                ready.push_back(serde_json::from_str(&line).map_err(RemoteError::from));
                            }
                        }
                    }
                }
            },
        );
        Ok(stream.boxed())
    }
}

/// Splits a byte stream into non-empty text lines
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line).trim().to_string();
            if !text.is_empty() {
                lines.push(text);
            }
        }
        lines
    }

    pub fn finish(&mut self) -> Option<String> {
        let text = String::from_utf8_lossy(&std::mem::take(&mut self.buffer))
            .trim()
            .to_string();
        (!text.is_empty()).then_some(text)
    }
}
