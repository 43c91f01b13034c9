use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::SignInCommand;
use crate::account::models::SignInResult;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<ApiSuccess<SessionData>, ApiError> {
    // Unknown email and wrong password both surface as the same 401.
    state
        .account_service
        .sign_in(SignInCommand::new(body.email, body.password))
        .await
        .map_err(ApiError::from)
        .map(|ref result| ApiSuccess::new(StatusCode::OK, result.into()))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequest {
    email: String,
    password: String,
}

impl std::fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Session issued by sign-in or refresh.
///
/// `expiration_time` is the access token expiry in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionData {
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub token: String,
    pub refresh_token: String,
    pub expiration_time: i64,
    pub message: String,
}

impl From<&SignInResult> for SessionData {
    fn from(result: &SignInResult) -> Self {
        Self {
            display_name: result.account.display_name.as_str().to_string(),
            email: result.account.email.as_str().to_string(),
            role: result.account.role.as_str().to_string(),
            token: result.tokens.access_token.clone(),
            refresh_token: result.tokens.refresh_token.clone(),
            expiration_time: result.tokens.expires_at.timestamp_millis(),
            message: "success".to_string(),
        }
    }
}
