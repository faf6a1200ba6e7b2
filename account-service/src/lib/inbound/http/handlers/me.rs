use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use super::resolve_caller;
use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::router::AppState;

pub async fn me(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let caller = resolve_caller(&state, &jar).await?;

    caller
        .user
        .as_ref()
        .map(|user| ApiSuccess::new(StatusCode::OK, user.into()))
        .ok_or_else(|| ApiError::NotFound("Not signed in".to_string()))
}
