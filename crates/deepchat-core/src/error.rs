use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeepChatError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Model returned no usable content")]
    EmptyResponse,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not read history: {0}")]
    HistoryRead(String),

    #[error("Could not write history: {0}")]
    HistoryWrite(String),

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DeepChatError {
    /// Whether the failure came from the remote model call, as opposed to
    /// local configuration or history handling.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Llm(_) | Self::EmptyResponse | Self::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, DeepChatError>;
