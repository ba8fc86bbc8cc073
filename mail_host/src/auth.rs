use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use mail_tools::AssistantError;

use crate::error::ApiError;

/// Access token taken from `Authorization: Bearer <token>`.
///
/// Only the header's shape is checked; the token itself is passed through
/// to Google untouched.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

pub fn parse_bearer(header: Option<&str>) -> Option<&str> {
    header?.strip_prefix("Bearer ")
}

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        parse_bearer(header)
            .map(|token| BearerToken(token.to_string()))
            .ok_or(ApiError::Assistant(AssistantError::Unauthorized))
    }
}
