//! Account and session routes: registration, login, token refresh, password
//! reset, and token introspection. All of these are public; the route table
//! in `auth::access` is the authority.

pub mod get;
pub mod post;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;
use get::validate_token;
use post::{forgot_password, login, refresh_token, register};

/// Builds the account/session route group.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
        .route("/forgot-password", post(forgot_password))
        .route("/validate/token", get(validate_token))
}
