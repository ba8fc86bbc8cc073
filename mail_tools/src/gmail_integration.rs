//! Gmail REST client used by the HTTP handlers.
//!
//! Wire types keep only the fields the listing and decoder read; serde
//! ignores the rest of Gmail's response.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::config::GmailApiConfig;
use crate::decoder::{sender_of, subject_of, truncate_chars};
use crate::error::{AssistantError, Result};

/// Messages fetched by `list_recent`.
pub const RECENT_LIMIT: u32 = 5;

/// Snippet characters kept per listed message.
pub const SNIPPET_LIMIT: usize = 100;

/// Gmail API response types
pub mod api {
    use serde::{Deserialize, Serialize};

    /// Response from listing messages
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ListMessagesResponse {
        pub messages: Option<Vec<MessageRef>>,
    }

    /// Reference to a message
    #[derive(Debug, Clone, Deserialize)]
    pub struct MessageRef {
        pub id: String,
    }

    /// Full message from Gmail API
    #[derive(Debug, Deserialize)]
    pub struct GmailMessage {
        pub id: String,
        pub snippet: Option<String>,
        pub payload: Option<MessagePayload>,
    }

    /// Message payload containing headers and body
    #[derive(Debug, Deserialize)]
    pub struct MessagePayload {
        pub headers: Option<Vec<Header>>,
        pub body: Option<MessageBody>,
        pub parts: Option<Vec<MessagePart>>,
    }

    /// Email header (name-value pair)
    #[derive(Debug, Deserialize, Serialize)]
    pub struct Header {
        pub name: String,
        pub value: String,
    }

    /// Message body (base64url encoded)
    #[derive(Debug, Deserialize)]
    pub struct MessageBody {
        pub data: Option<String>,
    }

    /// Message part (for multipart messages); only its body is read
    #[derive(Debug, Deserialize)]
    pub struct MessagePart {
        pub body: Option<MessageBody>,
    }
}

use api::{GmailMessage, ListMessagesResponse, MessageRef};

/// One row of the recent-mail listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSummary {
    pub id: String,
    pub sender: String,
    pub subject: String,
    pub snippet: String,
}

/// Body of a send request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Body of a delete request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub email_id: String,
}

/// Fields reprojected from the userinfo endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Build the minimal RFC 2822 message and encode it for the `raw` field.
///
/// The sender is always the literal `me`, which Gmail resolves to the
/// authenticated account.
pub fn encode_raw_message(email: &OutboundEmail) -> String {
    let email_content = format!(
        "From: me\nTo: {}\nSubject: {}\n\n{}",
        email.to, email.subject, email.body
    );
    URL_SAFE.encode(email_content.as_bytes())
}

/// Gmail REST client. Every call forwards the caller's access token; the
/// token is never validated here.
#[derive(Debug, Clone)]
pub struct GmailClient {
    http: Client,
    api: GmailApiConfig,
}

impl GmailClient {
    pub fn new(http: Client, api: GmailApiConfig) -> Self {
        Self { http, api }
    }

    fn messages_url(&self) -> String {
        format!("{}/users/me/messages", self.api.api_base)
    }

    fn message_url(&self, id: &str) -> String {
        format!("{}/{}", self.messages_url(), urlencoding::encode(id))
    }

    pub async fn get_profile(&self, access_token: &str) -> Result<UserProfile> {
        let resp = self
            .http
            .get(&self.api.userinfo_uri)
            .bearer_auth(access_token)
            .send()
            .await?;

        let user_data: Value = read_json(ensure_success(resp, "userinfo").await?).await?;
        let user_data = user_data
            .as_object()
            .ok_or_else(|| AssistantError::Decode("userinfo response is not an object".into()))?;

        let field = |name: &str| user_data.get(name).and_then(Value::as_str).map(str::to_string);

        Ok(UserProfile {
            email: field("email"),
            name: field("name"),
            picture: field("picture"),
        })
    }

    pub async fn list_message_ids(
        &self,
        access_token: &str,
        max_results: u32,
    ) -> Result<Vec<MessageRef>> {
        let resp = self
            .http
            .get(self.messages_url())
            .query(&[("maxResults", max_results)])
            .bearer_auth(access_token)
            .send()
            .await?;

        let list: ListMessagesResponse = read_json(ensure_success(resp, "list messages").await?).await?;
        Ok(list.messages.unwrap_or_default())
    }

    pub async fn get_message(&self, access_token: &str, id: &str) -> Result<GmailMessage> {
        let resp = self
            .http
            .get(self.message_url(id))
            .bearer_auth(access_token)
            .send()
            .await?;

        read_json(ensure_success(resp, "get message").await?).await
    }

    /// Newest messages with sender, subject and a shortened snippet.
    ///
    /// One list call followed by one sequential fetch per message. The
    /// first failure aborts the whole listing.
    pub async fn list_recent(&self, access_token: &str) -> Result<Vec<EmailSummary>> {
        let refs = self.list_message_ids(access_token, RECENT_LIMIT).await?;
        debug!("Fetching {} recent messages", refs.len());

        let mut emails = Vec::with_capacity(refs.len());
        for msg in refs {
            let message = self.get_message(access_token, &msg.id).await?;
            let payload = message.payload.as_ref();

            emails.push(EmailSummary {
                id: msg.id,
                sender: sender_of(payload),
                subject: subject_of(payload),
                snippet: truncate_chars(message.snippet.as_deref().unwrap_or(""), SNIPPET_LIMIT),
            });
        }

        Ok(emails)
    }

    /// Send a message. Only HTTP 200 counts as success.
    pub async fn send(&self, access_token: &str, email: &OutboundEmail) -> Result<()> {
        let payload = json!({
            "raw": encode_raw_message(email)
        });

        let resp = self
            .http
            .post(format!("{}/send", self.messages_url()))
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await?;

        expect_status(resp, StatusCode::OK, "send").await
    }

    /// Delete a message. Only HTTP 204 counts as success.
    pub async fn delete(&self, access_token: &str, id: &str) -> Result<()> {
        let resp = self
            .http
            .delete(self.message_url(id))
            .bearer_auth(access_token)
            .send()
            .await?;

        expect_status(resp, StatusCode::NO_CONTENT, "delete").await
    }
}

async fn upstream_error(resp: Response, action: &str) -> AssistantError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    error!("Gmail {} error ({}): {}", action, status, body);
    AssistantError::Upstream { status, body }
}

async fn ensure_success(resp: Response, action: &str) -> Result<Response> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(upstream_error(resp, action).await)
    }
}

async fn expect_status(resp: Response, expected: StatusCode, action: &str) -> Result<()> {
    if resp.status() == expected {
        Ok(())
    } else {
        Err(upstream_error(resp, action).await)
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}
