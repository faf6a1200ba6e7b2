use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::SignUpInput;
use crate::inbound::http::router::AppState;

pub async fn sign_up(
    State(state): State<AppState>,
    Json(body): Json<SignUpRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .account_service
        .sign_up(body.into_input())
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    first_name: String,
    last_name: String,
    username: String,
    email: String,
    password: String,
}

impl SignUpRequest {
    fn into_input(self) -> SignUpInput {
        SignUpInput {
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
            email: self.email,
            password: self.password,
        }
    }
}
