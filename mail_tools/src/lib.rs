//! Building blocks for the Gmail AI assistant backend.
//!
//! - OAuth2 authorization-code flow and token persistence
//! - Gmail REST client (profile, recent messages, send, delete)
//! - Message payload decoding
//! - Chat-completion client and the summarize / draft-reply prompts

pub mod ai_client;
pub mod chat_completion;
pub mod config;
pub mod decoder;
pub mod error;
pub mod gmail_integration;
pub mod oauth;
pub mod token_store;

pub use ai_client::{AIClient, AIRequestBuilder, EmailAi, GenerationConfig};
pub use chat_completion::ChatCompletionClient;
pub use config::{AiConfig, AssistantConfig, GmailApiConfig, GoogleOAuthConfig, SERVICE_NAME};
pub use decoder::{decode_message, DecodedMessage, BODY_PROMPT_LIMIT};
pub use error::{AssistantError, Result};
pub use gmail_integration::{DeleteRequest, EmailSummary, GmailClient, OutboundEmail, UserProfile};
pub use oauth::CallbackOutcome;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenRecord, TokenStore};
