use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use super::resolve_caller;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::guards::admin_only;
use crate::inbound::http::router::AppState;

pub async fn delete_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<ApiSuccess<bool>, ApiError> {
    let caller = resolve_caller(&state, &jar).await?;
    admin_only().check(&caller).await?;

    state
        .account_service
        .delete_user(&id)
        .await
        .map_err(ApiError::from)
        .map(|deleted| ApiSuccess::new(StatusCode::OK, deleted))
}
