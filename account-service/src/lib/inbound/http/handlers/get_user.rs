use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    // A malformed id denotes a user that cannot exist: absent, not a fault.
    let Ok(user_id) = UserId::from_string(&id) else {
        return Err(ApiError::NotFound(format!("User not found: {}", id)));
    };

    state
        .account_service
        .get_user(&user_id)
        .await?
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
        .ok_or_else(|| ApiError::NotFound(format!("User not found: {}", id)))
}
