use auth::AuthenticatedContext;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::get_profile::ProfileData;
use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::DisplayName;
use crate::account::models::Password;
use crate::account::models::UpdateProfileCommand;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

/// HTTP request body for a partial profile update (raw JSON)
///
/// Unknown fields such as `role` or `email` are ignored.
#[derive(Deserialize, Default)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub password: Option<String>,
    pub avatar_path: Option<String>,
}

impl UpdateProfileRequest {
    fn try_into_command(self) -> Result<UpdateProfileCommand, AccountError> {
        let display_name = self.display_name.map(DisplayName::new).transpose()?;
        let password = self.password.map(Password::new).transpose()?;

        Ok(UpdateProfileCommand {
            display_name,
            bio: self.bio,
            password,
            avatar_path: self.avatar_path,
        })
    }
}

/// Updated profile plus a confirmation message.
#[derive(Debug, Serialize, PartialEq)]
pub struct UpdateProfileResponse {
    #[serde(flatten)]
    pub profile: ProfileData,
    pub message: String,
}

impl From<&Account> for UpdateProfileResponse {
    fn from(account: &Account) -> Self {
        Self {
            profile: account.into(),
            message: "update success".to_string(),
        }
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(context): Extension<AuthenticatedContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<ApiSuccess<UpdateProfileResponse>, ApiError> {
    let command = req.try_into_command()?;

    state
        .account_service
        .update_profile(&context, command)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::OK, account.into()))
}
