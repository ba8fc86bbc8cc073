use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use mail_tools::decoder::truncate_chars;
use mail_tools::oauth::{build_auth_url, callback_redirect, handle_callback};
use mail_tools::{
    decode_message, DecodedMessage, DeleteRequest, EmailSummary, OutboundEmail, UserProfile,
    BODY_PROMPT_LIMIT, SERVICE_NAME,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::BearerToken;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailIdParams {
    pub email_id: String,
}

#[derive(Debug, Serialize)]
pub struct EmailsResponse {
    pub emails: Vec<EmailSummary>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: &'static str,
}

/// 302 with a `Location` header.
fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
    })
}

pub async fn google_login(State(state): State<AppState>) -> Response {
    found(build_auth_url(&state.config.oauth))
}

pub async fn google_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let outcome = handle_callback(
        &state.http,
        &state.config.oauth,
        state.tokens.as_ref(),
        params.code.as_deref(),
    )
    .await;

    found(callback_redirect(&state.config.frontend_url, &outcome))
}

pub async fn get_user_profile(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<UserProfile>, ApiError> {
    state.gmail.get_profile(&token).await.map(Json).map_err(|e| {
        warn!(kind = e.kind(), "Profile fetch failed: {}", e);
        ApiError::BadRequest("Failed to fetch profile".to_string())
    })
}

pub async fn read_emails(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<EmailsResponse>, ApiError> {
    let emails = state.gmail.list_recent(&token).await?;
    Ok(Json(EmailsResponse { emails }))
}

async fn fetch_decoded(state: &AppState, token: &str, email_id: &str) -> Result<DecodedMessage, ApiError> {
    let message = state.gmail.get_message(token, email_id).await?;
    let mut decoded = decode_message(&message)?;
    decoded.body = truncate_chars(&decoded.body, BODY_PROMPT_LIMIT);
    Ok(decoded)
}

pub async fn summarize_email(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Query(params): Query<EmailIdParams>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let email = fetch_decoded(&state, &token, &params.email_id).await?;
    let summary = state.ai.summarize(&email.subject, &email.body).await;
    Ok(Json(SummaryResponse { summary }))
}

pub async fn generate_reply(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Query(params): Query<EmailIdParams>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let email = fetch_decoded(&state, &token, &params.email_id).await?;
    let reply = state
        .ai
        .draft_reply(&email.subject, &email.sender, &email.body)
        .await;
    Ok(Json(ReplyResponse { reply }))
}

pub async fn send_email(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(request): Json<OutboundEmail>,
) -> Result<Json<ActionResponse>, ApiError> {
    state.gmail.send(&token, &request).await?;
    info!("Sent email to {}", request.to);
    Ok(Json(ActionResponse {
        success: true,
        message: "Email sent!",
    }))
}

pub async fn delete_email(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    state.gmail.delete(&token, &request.email_id).await?;
    info!("Deleted email {}", request.email_id);
    Ok(Json(ActionResponse {
        success: true,
        message: "Email deleted!",
    }))
}
