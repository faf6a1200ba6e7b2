use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::router::AppState;

pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignInRequest>,
) -> Result<(CookieJar, ApiSuccess<UserData>), ApiError> {
    let user = state
        .account_service
        .sign_in(&body.login, &body.password)
        .await?
        // Unknown login, wrong password, and unconfirmed account all
        // surface as the same denial.
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let jar = state.session_manager.establish(jar, &user.id).await?;

    Ok((jar, ApiSuccess::new(StatusCode::OK, (&user).into())))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequest {
    login: String,
    password: String,
}
