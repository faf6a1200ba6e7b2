use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<bool>), ApiError> {
    let jar = state.session_manager.destroy(jar).await?;

    Ok((jar, ApiSuccess::new(StatusCode::OK, true)))
}
