use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Configuration for AI model generation
#[derive(Debug, Clone, Default)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Builder for constructing AI requests
#[async_trait]
pub trait AIRequestBuilder: Send {
    /// Add a system message
    fn system(self: Box<Self>, content: String) -> Box<dyn AIRequestBuilder>;

    /// Add a user message
    fn user(self: Box<Self>, content: String) -> Box<dyn AIRequestBuilder>;

    /// Set generation parameters
    fn config(self: Box<Self>, config: GenerationConfig) -> Box<dyn AIRequestBuilder>;

    /// Execute the request and get response as a single string
    async fn execute(self: Box<Self>) -> Result<String>;
}

/// Core trait for AI model implementations
pub trait AIClient: Send + Sync {
    /// Create a new request builder
    fn builder(&self) -> Box<dyn AIRequestBuilder>;

    /// Get the model's name/identifier
    fn model_name(&self) -> String;
}

pub const SUMMARY_MAX_TOKENS: u32 = 150;
pub const REPLY_MAX_TOKENS: u32 = 200;

pub fn summary_prompt(subject: &str, body: &str) -> String {
    format!(
        "Summarize this email in 2-3 sentences:\n\nSubject: {}\n\nBody: {}",
        subject, body
    )
}

pub fn reply_prompt(subject: &str, sender: &str, body: &str) -> String {
    format!(
        "Write a professional, polite reply email to this message. Keep it concise (under 100 words):\n\nFrom: {}\nSubject: {}\n\nMessage:\n{}\n\nReply:",
        sender, subject, body
    )
}

/// The two prompt templates the assistant offers.
///
/// `summarize` and `draft_reply` never fail: a failed model call comes back
/// as text starting with `"Error: "`, indistinguishable by type from model
/// output. Use the `*_result` variants to tell them apart.
#[derive(Clone)]
pub struct EmailAi {
    client: Arc<dyn AIClient>,
}

impl EmailAi {
    pub fn new(client: Arc<dyn AIClient>) -> Self {
        Self { client }
    }

    async fn complete(&self, prompt: String, max_tokens: u32) -> Result<String> {
        debug!("Sending {}-token-capped prompt to {}", max_tokens, self.client.model_name());
        self.client
            .builder()
            .user(prompt)
            .config(GenerationConfig {
                max_tokens: Some(max_tokens),
                ..Default::default()
            })
            .execute()
            .await
    }

    pub async fn summarize_result(&self, subject: &str, body: &str) -> Result<String> {
        self.complete(summary_prompt(subject, body), SUMMARY_MAX_TOKENS).await
    }

    pub async fn draft_reply_result(&self, subject: &str, sender: &str, body: &str) -> Result<String> {
        self.complete(reply_prompt(subject, sender, body), REPLY_MAX_TOKENS).await
    }

    pub async fn summarize(&self, subject: &str, body: &str) -> String {
        self.summarize_result(subject, body)
            .await
            .unwrap_or_else(|e| error_text("summarize", e))
    }

    pub async fn draft_reply(&self, subject: &str, sender: &str, body: &str) -> String {
        self.draft_reply_result(subject, sender, body)
            .await
            .unwrap_or_else(|e| error_text("draft reply", e))
    }
}

fn error_text(action: &str, err: anyhow::Error) -> String {
    warn!("AI {} failed: {}", action, err);
    format!("Error: {}", err)
}
