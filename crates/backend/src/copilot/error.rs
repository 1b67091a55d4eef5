use thiserror::Error;

use crate::shared::llm::LlmError;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote endpoint {url} answered {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode remote response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("agent '{0}' is not provided by any remote endpoint")]
    UnknownAgent(String),

    #[error("client disconnected")]
    ClientDisconnected,
}
