use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::user::models::User;
use crate::inbound::http::guards::AccessDenied;
use crate::inbound::http::guards::Caller;
use crate::inbound::http::router::AppState;
use crate::user::errors::SessionStoreError;
use crate::user::errors::UserError;

pub mod change_password;
pub mod confirm_user;
pub mod delete_user;
pub mod forgot_password;
pub mod get_user;
pub mod list_users;
pub mod logout;
pub mod me;
pub mod sign_in;
pub mod sign_up;

/// Resolve the caller's identity from the session cookie.
///
/// A missing or dead session is an anonymous caller, not an error; the
/// store is re-read on every request.
pub(crate) async fn resolve_caller(state: &AppState, jar: &CookieJar) -> Result<Caller, ApiError> {
    let Some(user_id) = state.session_manager.current(jar).await? else {
        return Ok(Caller::anonymous());
    };

    let user = state.account_service.get_user(&user_id).await?;
    Ok(user.map(Caller::from_user).unwrap_or_else(Caller::anonymous))
}

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::UsernameAlreadyExists(_) | UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict(err.to_string())
            }
            UserError::Validation(_)
            | UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidRole(_)
            | UserError::InvalidUserId(_) => ApiError::UnprocessableEntity(err.to_string()),
            UserError::Password(_)
            | UserError::TokenStore(_)
            | UserError::SessionStore(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<SessionStoreError> for ApiError {
    fn from(err: SessionStoreError) -> Self {
        ApiError::InternalServerError(err.to_string())
    }
}

impl From<AccessDenied> for ApiError {
    fn from(err: AccessDenied) -> Self {
        match err {
            AccessDenied::NotAuthenticated => ApiError::Unauthorized(err.to_string()),
            AccessDenied::NotAuthorized => ApiError::Forbidden(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// User as exposed on the wire. The password hash never leaves the
/// service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            full_name: user.full_name(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            confirmed: user.confirmed,
            created_at: user.created_at,
        }
    }
}
