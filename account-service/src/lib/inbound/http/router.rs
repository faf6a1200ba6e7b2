use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::change_password::change_password;
use super::handlers::confirm_user::confirm_user;
use super::handlers::delete_user::delete_user;
use super::handlers::forgot_password::forgot_password;
use super::handlers::get_user::get_user;
use super::handlers::list_users::list_users;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::sign_in::sign_in;
use super::handlers::sign_up::sign_up;
use super::session::SessionManager;
use crate::user::ports::AccountServicePort;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServicePort>,
    pub session_manager: Arc<SessionManager>,
}

pub fn create_router(
    account_service: Arc<dyn AccountServicePort>,
    session_manager: Arc<SessionManager>,
) -> Router {
    let state = AppState {
        account_service,
        session_manager,
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users", post(sign_up))
        .route("/api/users/:user_id", get(get_user))
        .route("/api/users/:user_id", delete(delete_user))
        .route("/api/me", get(me))
        .route("/api/auth/login", post(sign_in))
        .route("/api/auth/confirm", post(confirm_user))
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/auth/change-password", post(change_password))
        .route("/api/auth/logout", post(logout))
        .layer(trace_layer)
        // Credentialed CORS: the session cookie must survive cross-origin
        // calls from the web client.
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
