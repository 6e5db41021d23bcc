//! HTTP route entry point.
//!
//! The surface is flat: `/register`, `/cart`, `/offs/{course_id}` and
//! friends live at the root, so the groups below merge into one router
//! instead of nesting under prefixes. Access control is not wired per
//! group: the auth gate fronts the whole router and consults the route
//! table in `auth::access`, which is the single authority on which paths
//! are public, protected, or admin-only.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod common;
pub mod courses;
pub mod health;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::auth::gate::auth_gate;
use crate::auth::middleware::log_request;
use crate::state::AppState;
use admin::admin_routes;
use auth::auth_routes;
use cart::cart_routes;
use courses::courses_routes;
use health::health_routes;
use util::{config, paths};

/// All API routes, stateful but without the middleware stack.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .merge(auth_routes())
        .merge(cart_routes())
        .merge(courses_routes())
        .merge(admin_routes())
        .merge(health_routes())
        .with_state(app_state)
}

/// The complete application: routes, static serving of uploaded files, and
/// the middleware stack (body limit, request logging, auth gate, CORS).
pub fn app(app_state: AppState) -> Router {
    let cors = CorsLayer::very_permissive();

    Router::new()
        .merge(routes(app_state.clone()))
        .nest_service("/uploads", ServeDir::new(paths::upload_root()))
        .layer(from_fn_with_state(app_state, auth_gate))
        .layer(from_fn(log_request))
        .layer(DefaultBodyLimit::max(config::max_upload_bytes()))
        .layer(cors)
}
