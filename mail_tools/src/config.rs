use std::path::PathBuf;

use crate::error::{AssistantError, Result};

/// Basic config for OAuth
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub scopes: Vec<String>,
}

/// Endpoints used by the Gmail client
#[derive(Debug, Clone)]
pub struct GmailApiConfig {
    pub api_base: String,
    pub userinfo_uri: String,
}

/// Chat-completion provider settings
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub oauth: GoogleOAuthConfig,
    pub gmail: GmailApiConfig,
    pub ai: AiConfig,
    pub frontend_url: String,
    pub token_file: PathBuf,
    pub bind_addr: String,
}

pub const SERVICE_NAME: &str = "Gmail AI Assistant";

const REQUIRED_VARS: [&str; 5] = [
    "GOOGLE_CLIENT_ID",
    "GOOGLE_CLIENT_SECRET",
    "GOOGLE_REDIRECT_URI",
    "FRONTEND_URL",
    "GROQ_API_KEY",
];

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/v2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_userinfo_uri() -> String {
    "https://www.googleapis.com/oauth2/v2/userinfo".to_string()
}

fn default_gmail_api_base() -> String {
    "https://gmail.googleapis.com/gmail/v1".to_string()
}

fn default_ai_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

pub fn default_scopes() -> Vec<String> {
    vec![
        "https://www.googleapis.com/auth/gmail.readonly".to_string(),
        "https://www.googleapis.com/auth/gmail.send".to_string(),
        "https://www.googleapis.com/auth/gmail.modify".to_string(),
        "https://www.googleapis.com/auth/gmail.labels".to_string(),
        "openid".to_string(),
        "email".to_string(),
        "profile".to_string(),
    ]
}

impl AssistantConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Empty values count as missing. All missing required variables are
    /// reported in one error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing_vars: Vec<&str> = REQUIRED_VARS
            .into_iter()
            .filter(|&var| get(var).is_none())
            .collect();

        if !missing_vars.is_empty() {
            return Err(AssistantError::Config(format!(
                "Missing required environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        let required = |key: &str| get(key).unwrap_or_default();

        Ok(Self {
            oauth: GoogleOAuthConfig {
                client_id: required("GOOGLE_CLIENT_ID"),
                client_secret: required("GOOGLE_CLIENT_SECRET"),
                redirect_uri: required("GOOGLE_REDIRECT_URI"),
                auth_uri: get("GOOGLE_AUTH_URI").unwrap_or_else(default_auth_uri),
                token_uri: get("GOOGLE_TOKEN_URI").unwrap_or_else(default_token_uri),
                scopes: default_scopes(),
            },
            gmail: GmailApiConfig {
                api_base: trim_base(get("GMAIL_API_BASE").unwrap_or_else(default_gmail_api_base)),
                userinfo_uri: get("GOOGLE_USERINFO_URI").unwrap_or_else(default_userinfo_uri),
            },
            ai: AiConfig {
                api_key: required("GROQ_API_KEY"),
                api_base: trim_base(get("GROQ_API_BASE").unwrap_or_else(default_ai_api_base)),
                model: get("GROQ_MODEL").unwrap_or_else(default_model),
            },
            frontend_url: required("FRONTEND_URL"),
            token_file: PathBuf::from(get("TOKEN_FILE").unwrap_or_else(|| "token.json".to_string())),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8000".to_string()),
        })
    }

    /// Origin value for CORS: the frontend URL without a trailing slash.
    pub fn frontend_origin(&self) -> &str {
        self.frontend_url.trim_end_matches('/')
    }
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}
