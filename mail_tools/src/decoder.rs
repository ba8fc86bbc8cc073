//! Field extraction from Gmail message payloads.
//!
//! Shared by the listing, summarize and reply paths. Only the shapes the
//! handlers need are understood: a flat header list and either a top-level
//! body or the first part's body. Nested parts, alternatives and
//! attachments are ignored, and no HTML is stripped.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde::Serialize;

use crate::error::{AssistantError, Result};
use crate::gmail_integration::api::{GmailMessage, Header, MessagePayload};

pub const DEFAULT_SUBJECT: &str = "(No Subject)";
pub const DEFAULT_SENDER: &str = "Unknown";

/// Body characters handed to the language model.
pub const BODY_PROMPT_LIMIT: usize = 500;

/// Gmail emits URL-safe base64 with or without padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedMessage {
    pub subject: String,
    pub sender: String,
    pub body: String,
}

/// Exact, case-sensitive header lookup. First match wins.
pub fn find_header<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name == name)
        .map(|h| h.value.as_str())
}

fn headers_of(payload: Option<&MessagePayload>) -> &[Header] {
    payload
        .and_then(|p| p.headers.as_deref())
        .unwrap_or(&[])
}

pub fn subject_of(payload: Option<&MessagePayload>) -> String {
    find_header(headers_of(payload), "Subject")
        .unwrap_or(DEFAULT_SUBJECT)
        .to_string()
}

pub fn sender_of(payload: Option<&MessagePayload>) -> String {
    find_header(headers_of(payload), "From")
        .unwrap_or(DEFAULT_SENDER)
        .to_string()
}

/// Raw body data: the first part's when `parts` is present, otherwise the
/// top-level body's.
pub fn body_data(payload: &MessagePayload) -> Option<&str> {
    match &payload.parts {
        Some(parts) => parts
            .first()
            .and_then(|part| part.body.as_ref())
            .and_then(|body| body.data.as_deref()),
        None => payload.body.as_ref().and_then(|body| body.data.as_deref()),
    }
}

pub fn decode_body_data(data: &str) -> Result<String> {
    let bytes = URL_SAFE_LENIENT
        .decode(data)
        .map_err(|e| AssistantError::Decode(format!("Invalid base64 body: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| AssistantError::Decode(format!("Body is not valid UTF-8: {}", e)))
}

pub fn decode_message(message: &GmailMessage) -> Result<DecodedMessage> {
    let payload = message.payload.as_ref();

    let body = match payload.and_then(body_data) {
        Some(data) if !data.is_empty() => decode_body_data(data)?,
        _ => String::new(),
    };

    Ok(DecodedMessage {
        subject: subject_of(payload),
        sender: sender_of(payload),
        body,
    })
}

/// First `limit` characters of `s`.
pub fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}
