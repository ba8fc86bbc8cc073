use std::sync::Arc;

use mail_tools::{
    AIClient, AssistantConfig, ChatCompletionClient, EmailAi, GmailClient, TokenStore,
};

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AssistantConfig>,
    pub http: reqwest::Client,
    pub gmail: GmailClient,
    pub ai: EmailAi,
    pub tokens: Arc<dyn TokenStore>,
}

impl AppState {
    /// State backed by the configured chat-completion provider.
    pub fn new(config: AssistantConfig, tokens: Arc<dyn TokenStore>) -> Self {
        let http = reqwest::Client::new();
        let ai_client = ChatCompletionClient::new(&config.ai, http.clone());
        Self::with_parts(config, http, tokens, Arc::new(ai_client))
    }

    pub fn with_parts(
        config: AssistantConfig,
        http: reqwest::Client,
        tokens: Arc<dyn TokenStore>,
        ai_client: Arc<dyn AIClient>,
    ) -> Self {
        let gmail = GmailClient::new(http.clone(), config.gmail.clone());
        Self {
            config: Arc::new(config),
            http,
            gmail,
            ai: EmailAi::new(ai_client),
            tokens,
        }
    }
}
