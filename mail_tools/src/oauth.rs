//! Google OAuth2 authorization-code flow, server side.
//!
//! The consent redirect and the callback exchange both live here; the host
//! only turns a [`CallbackOutcome`] into a redirect to the frontend.

use reqwest::Client;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::GoogleOAuthConfig;
use crate::error::{AssistantError, Result};
use crate::token_store::{TokenRecord, TokenStore};

/// Redirect parameter when the callback carried no code.
pub const NO_CODE: &str = "no_code";
/// Redirect parameter when the exchange or persistence failed.
pub const CALLBACK_FAILED: &str = "callback_failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Access token handed to the frontend in the query string.
    Token(String),
    /// Error code handed to the frontend in the query string.
    Error(String),
}

/// ---------------------------------------
/// Helper: Build the Google OAuth 2.0 authorization URL
/// ---------------------------------------
pub fn build_auth_url(config: &GoogleOAuthConfig) -> String {
    let scopes_str = config.scopes.join(" ");
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
        config.auth_uri,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(&config.redirect_uri),
        urlencoding::encode(&scopes_str)
    )
}

/// ---------------------------------------
/// Helper: Exchange an auth code for an access/refresh token
/// ---------------------------------------
///
/// Google reports OAuth failures in the JSON body, so the body is parsed
/// whatever the status code.
pub async fn exchange_code(client: &Client, config: &GoogleOAuthConfig, code: &str) -> Result<TokenRecord> {
    let params = [
        ("code", code),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("grant_type", "authorization_code"),
    ];

    let text = client
        .post(&config.token_uri)
        .form(&params)
        .send()
        .await?
        .text()
        .await?;

    match serde_json::from_str::<Value>(&text)? {
        Value::Object(fields) => Ok(TokenRecord::new(fields)),
        other => Err(AssistantError::Decode(format!(
            "Token endpoint returned a non-object body: {}",
            other
        ))),
    }
}

/// Run the callback: exchange the code, persist the record, report back.
pub async fn handle_callback(
    client: &Client,
    config: &GoogleOAuthConfig,
    store: &dyn TokenStore,
    code: Option<&str>,
) -> CallbackOutcome {
    let code = match code.filter(|c| !c.is_empty()) {
        Some(c) => c,
        None => {
            warn!("OAuth callback without authorization code");
            return CallbackOutcome::Error(NO_CODE.to_string());
        }
    };

    match exchange_and_store(client, config, store, code).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("OAuth callback failed ({}): {}", e.kind(), e);
            CallbackOutcome::Error(CALLBACK_FAILED.to_string())
        }
    }
}

async fn exchange_and_store(
    client: &Client,
    config: &GoogleOAuthConfig,
    store: &dyn TokenStore,
    code: &str,
) -> Result<CallbackOutcome> {
    let record = exchange_code(client, config, code).await?;

    if let Some(err) = record.get("error") {
        let code = match err {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        warn!("Token endpoint rejected the authorization code: {}", code);
        return Ok(CallbackOutcome::Error(code));
    }

    store.save(&record).await?;
    info!("OAuth exchange successful, token record stored");

    Ok(CallbackOutcome::Token(
        record.access_token().unwrap_or_default().to_string(),
    ))
}

/// Frontend URL carrying either `?token=` or `?error=`.
pub fn callback_redirect(frontend_url: &str, outcome: &CallbackOutcome) -> String {
    match outcome {
        CallbackOutcome::Token(token) => format!("{}?token={}", frontend_url, urlencoding::encode(token)),
        CallbackOutcome::Error(code) => format!("{}?error={}", frontend_url, urlencoding::encode(code)),
    }
}
