use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<ApiSuccess<bool>, ApiError> {
    state.account_service.forgot_password(&body.email).await?;

    // Uniform success whether or not the email belongs to an account.
    Ok(ApiSuccess::new(StatusCode::OK, true))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForgotPasswordRequest {
    email: String,
}
