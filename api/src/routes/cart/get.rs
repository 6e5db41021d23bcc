use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::auth::claims::AuthUser;
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;
use db::models::Course;

/// GET /cart
///
/// Returns the full course records for everything in the caller's cart.
/// Only user accounts have a cart; a token for any other account is `404`.
pub async fn get_cart(State(app_state): State<AppState>, AuthUser(claims): AuthUser) -> Response {
    let doc = app_state.store().read().await;

    let Some(user) = doc.user(&claims.sub) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("Account not found")),
        )
            .into_response();
    };

    let courses: Vec<Course> = doc
        .courses
        .iter()
        .filter(|course| user.cart.contains(&course.id))
        .cloned()
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(courses, "Cart fetched successfully")),
    )
        .into_response()
}
