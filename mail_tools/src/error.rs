use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Upstream error {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssistantError {
    /// Short, stable name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AssistantError::Unauthorized => "unauthorized",
            AssistantError::Upstream { .. } => "upstream",
            AssistantError::Decode(_) => "decode",
            AssistantError::Config(_) => "config",
            AssistantError::Http(_) => "http",
            AssistantError::Io(_) => "io",
        }
    }

    /// Text surfaced to API callers. Upstream failures pass the provider's
    /// body through untouched.
    pub fn client_message(&self) -> String {
        match self {
            AssistantError::Upstream { body, .. } => body.clone(),
            AssistantError::Decode(msg) | AssistantError::Config(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for AssistantError {
    fn from(err: serde_json::Error) -> Self {
        AssistantError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
