//! Admin-only routes: banning accounts and managing discounts. The auth
//! gate checks the caller's stored role on every request to this group.

pub mod post;

use axum::{Router, routing::post};

use crate::state::AppState;
use post::{ban, discount_all_courses, discount_course};

/// Builds the admin route group.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/ban", post(ban))
        .route("/offs/all", post(discount_all_courses))
        .route("/offs/{course_id}", post(discount_course))
}
