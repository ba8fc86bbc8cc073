//! HTTP surface of the Gmail AI assistant.
pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use mail_tools::{AssistantError, Result};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use crate::auth::BearerToken;
pub use crate::error::ApiError;
pub use crate::state::AppState;

/// CORS policy admitting only the configured frontend, with credentials.
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .map_err(|e| AssistantError::Config(format!("Invalid FRONTEND_URL origin {:?}: {}", origin, e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]))
}

pub fn build_router(state: AppState) -> Result<Router> {
    let cors = cors_layer(state.config.frontend_origin())?;

    Ok(Router::new()
        .route("/", get(routes::health))
        .route("/auth/google/login", get(routes::google_login))
        .route("/auth/google/callback", get(routes::google_callback))
        .route("/me", get(routes::get_user_profile))
        .route("/read-emails", get(routes::read_emails))
        .route("/summarize-email", post(routes::summarize_email))
        .route("/generate-reply", post(routes::generate_reply))
        .route("/send-email", post(routes::send_email))
        .route("/delete-email", post(routes::delete_email))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
