use auth::TokenError;
use auth::TokenKind;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that validates the bearer access token and puts the
/// resulting `AuthenticatedContext` into request extensions.
///
/// Refresh tokens are rejected here. Expired tokens answer "Token expired";
/// every other failure answers "Invalid token".
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let context = state
        .authenticator
        .authenticate(token, TokenKind::Access)
        .map_err(|e| {
            match &e {
                TokenError::Expired => tracing::info!("Rejected expired token"),
                other => tracing::warn!(error = %other, "Rejected token"),
            }
            ApiError::from(e).into_response()
        })?;

    tracing::debug!(subject = %context.subject, "Request authenticated");
    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| {
            ApiError::Unauthorized("Missing Authorization header".to_string()).into_response()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        ApiError::Unauthorized("Invalid Authorization header".to_string()).into_response()
    })?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )
        .into_response()
    })
}
