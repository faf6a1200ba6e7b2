use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::router::AppState;

pub async fn change_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<(CookieJar, ApiSuccess<UserData>), ApiError> {
    let user = state
        .account_service
        .change_password(&body.token, &body.password)
        .await?
        .ok_or_else(|| ApiError::NotFound("Token is invalid or expired".to_string()))?;

    // The subject proved control of their email; sign them in directly.
    let jar = state.session_manager.establish(jar, &user.id).await?;

    Ok((jar, ApiSuccess::new(StatusCode::OK, (&user).into())))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangePasswordRequest {
    token: String,
    password: String,
}
