use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn confirm_user(
    State(state): State<AppState>,
    Json(body): Json<ConfirmUserRequest>,
) -> Result<ApiSuccess<bool>, ApiError> {
    state
        .account_service
        .confirm_user(&body.token)
        .await
        .map_err(ApiError::from)
        .map(|confirmed| ApiSuccess::new(StatusCode::OK, confirmed))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfirmUserRequest {
    token: String,
}
