use async_openai::error::OpenAIError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set (add it to your environment or .env file)")]
    Missing(&'static str),

    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    OpenAI(#[from] OpenAIError),

    #[error("model returned an empty reply")]
    EmptyReply,
}

/// A model reply that is not one JSON object.
#[derive(Debug, Error)]
pub enum TurnDecodeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("expected a single JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// The model asked for a capability that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Tool '{0}' not available")]
pub struct UnknownCapability(pub String);

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error("unsupported write mode '{0}' (expected 'w' or 'a')")]
    WriteMode(String),

    #[error("'{0}' is not a directory")]
    NotADirectory(String),
}
