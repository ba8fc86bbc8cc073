use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai_client::{AIClient, AIRequestBuilder, GenerationConfig, Message, Role};
use crate::config::AiConfig;

// OpenAI-compatible chat-completion client (Groq by default)
pub struct ChatCompletionClient {
    api_key: String,
    api_base: String,
    model_name: String,
    client: reqwest::Client,
}

// Request structure for the chat-completion API
#[derive(Serialize, Debug)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize, Debug)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionClient {
    pub fn new(config: &AiConfig, client: reqwest::Client) -> Self {
        info!("Creating chat-completion client for model: {}", config.model);
        Self {
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            model_name: config.model.clone(),
            client,
        }
    }

    fn convert_message(message: &Message) -> ChatMessage {
        ChatMessage {
            role: message.role.as_str(),
            content: message.content.clone(),
        }
    }
}

impl AIClient for ChatCompletionClient {
    fn builder(&self) -> Box<dyn AIRequestBuilder> {
        Box::new(ChatCompletionRequestBuilder {
            api_key: self.api_key.clone(),
            endpoint: format!("{}/chat/completions", self.api_base),
            model_name: self.model_name.clone(),
            client: self.client.clone(),
            messages: Vec::new(),
            config: None,
        })
    }

    fn model_name(&self) -> String {
        self.model_name.clone()
    }
}

struct ChatCompletionRequestBuilder {
    api_key: String,
    endpoint: String,
    model_name: String,
    client: reqwest::Client,
    messages: Vec<Message>,
    config: Option<GenerationConfig>,
}

#[async_trait]
impl AIRequestBuilder for ChatCompletionRequestBuilder {
    fn system(mut self: Box<Self>, content: String) -> Box<dyn AIRequestBuilder> {
        self.messages.push(Message {
            role: Role::System,
            content,
        });
        self
    }

    fn user(mut self: Box<Self>, content: String) -> Box<dyn AIRequestBuilder> {
        self.messages.push(Message {
            role: Role::User,
            content,
        });
        self
    }

    fn config(mut self: Box<Self>, config: GenerationConfig) -> Box<dyn AIRequestBuilder> {
        self.config = Some(config);
        self
    }

    async fn execute(self: Box<Self>) -> Result<String> {
        let this = *self;
        info!("Executing chat-completion request for model: {}", this.model_name);

        let config = this.config.unwrap_or_default();
        let request = ChatCompletionRequest {
            model: this.model_name.clone(),
            messages: this
                .messages
                .iter()
                .map(ChatCompletionClient::convert_message)
                .collect(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        let response = this
            .client
            .post(&this.endpoint)
            .bearer_auth(&this.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to send chat-completion request: {}", e))?;

        // Handle error responses
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(anyhow!("Chat-completion API error ({}): {}", status, error_text));
        }

        let response_json: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse chat-completion response: {}", e))?;

        // Extract the text from the first choice
        match response_json.choices.into_iter().next() {
            Some(choice) => Ok(choice.message.content.unwrap_or_default()),
            None => Err(anyhow!("Chat-completion API returned no choices")),
        }
    }
}
