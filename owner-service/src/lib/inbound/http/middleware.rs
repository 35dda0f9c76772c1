use auth::Cause;
use auth::Error;
use auth::ErrorKind;
use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::inbound::http::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Reasons a request carries no usable bearer token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BearerTokenError {
    #[error("missing Authorization header")]
    MissingHeader,

    #[error("invalid Authorization header")]
    InvalidHeader,

    #[error("invalid Authorization header format, expected: Bearer <token>")]
    InvalidScheme,
}

impl From<BearerTokenError> for Error {
    fn from(e: BearerTokenError) -> Self {
        Error::with_cause(ErrorKind::Unauthorized, e.to_string(), Cause::error(e))
    }
}

/// Middleware that validates access tokens and adds the identity claim to
/// request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req).map_err(|e| {
        tracing::warn!(error = %e, "Missing bearer token");
        Error::from(e)
    })?;

    let identity = state.jwt_handler.verify(token).map_err(|e| {
        tracing::warn!(error = %e, "JWT validation failed");
        e
    })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, BearerTokenError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or(BearerTokenError::MissingHeader)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| BearerTokenError::InvalidHeader)?;

    auth_str
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(BearerTokenError::InvalidScheme)
}
