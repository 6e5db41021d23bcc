use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::claims::AuthUser;
use crate::response::{ApiResponse, Empty};
use crate::routes::common::format_validation_errors;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CartItemRequest {
    #[validate(length(min = 1, message = "Course id is required"))]
    pub course_id: String,
}

#[derive(Debug, Serialize)]
pub struct CartContents {
    pub cart: Vec<String>,
}

enum CartAddOutcome {
    NoSuchCourse,
    NoSuchUser,
    AlreadyInCart,
    AlreadyPurchased,
    Updated(Vec<String>),
}

/// POST /cart/add
///
/// Adds one course to the caller's cart. Duplicate entries and already-owned
/// courses are conflicts, not silent no-ops.
pub async fn add_to_cart(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CartItemRequest>,
) -> Response {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(error_message)),
        )
            .into_response();
    }

    let outcome = app_state
        .store()
        .mutate(move |doc| {
            if doc.course(&req.course_id).is_none() {
                return CartAddOutcome::NoSuchCourse;
            }
            let Some(user) = doc.user_mut(&claims.sub) else {
                return CartAddOutcome::NoSuchUser;
            };
            if user.cart.contains(&req.course_id) {
                return CartAddOutcome::AlreadyInCart;
            }
            if user.purchased_courses.contains(&req.course_id) {
                return CartAddOutcome::AlreadyPurchased;
            }
            user.cart.push(req.course_id);
            CartAddOutcome::Updated(user.cart.clone())
        })
        .await;

    match outcome {
        Ok(CartAddOutcome::Updated(cart)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                CartContents { cart },
                "Course added to cart",
            )),
        )
            .into_response(),
        Ok(CartAddOutcome::NoSuchCourse) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("Course not found")),
        )
            .into_response(),
        Ok(CartAddOutcome::NoSuchUser) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("Account not found")),
        )
            .into_response(),
        Ok(CartAddOutcome::AlreadyInCart) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error("Course is already in the cart")),
        )
            .into_response(),
        Ok(CartAddOutcome::AlreadyPurchased) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error("Course is already purchased")),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to persist cart change");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to persist cart change")),
            )
                .into_response()
        }
    }
}

enum CartRemoveOutcome {
    NoSuchUser,
    NotInCart,
    Updated(Vec<String>),
}

/// POST /cart/remove
///
/// Removes one course from the caller's cart.
pub async fn remove_from_cart(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CartItemRequest>,
) -> Response {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(error_message)),
        )
            .into_response();
    }

    let outcome = app_state
        .store()
        .mutate(move |doc| {
            let Some(user) = doc.user_mut(&claims.sub) else {
                return CartRemoveOutcome::NoSuchUser;
            };
            let Some(position) = user.cart.iter().position(|id| *id == req.course_id) else {
                return CartRemoveOutcome::NotInCart;
            };
            user.cart.remove(position);
            CartRemoveOutcome::Updated(user.cart.clone())
        })
        .await;

    match outcome {
        Ok(CartRemoveOutcome::Updated(cart)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                CartContents { cart },
                "Course removed from cart",
            )),
        )
            .into_response(),
        Ok(CartRemoveOutcome::NoSuchUser) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("Account not found")),
        )
            .into_response(),
        Ok(CartRemoveOutcome::NotInCart) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("Course is not in the cart")),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to persist cart change");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to persist cart change")),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub course_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub purchased_courses: Vec<String>,
    pub cart: Vec<String>,
}

/// POST /purchase
///
/// Moves courses into the caller's purchase set: the requested ids are
/// unioned into `purchased_courses` (already-owned ids are absorbed, not
/// duplicated) and any of them still sitting in the cart are removed.
/// Ids that were never in the cart purchase fine.
pub async fn purchase(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<PurchaseRequest>,
) -> Response {
    let outcome = app_state
        .store()
        .mutate(move |doc| {
            let user = doc.user_mut(&claims.sub)?;
            for course_id in &req.course_ids {
                if !user.purchased_courses.contains(course_id) {
                    user.purchased_courses.push(course_id.clone());
                }
            }
            user.cart.retain(|id| !req.course_ids.contains(id));
            Some(PurchaseResponse {
                purchased_courses: user.purchased_courses.clone(),
                cart: user.cart.clone(),
            })
        })
        .await;

    match outcome {
        Ok(Some(purchase)) => (
            StatusCode::OK,
            Json(ApiResponse::success(purchase, "Purchase completed")),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("Account not found")),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to persist purchase");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to persist purchase")),
            )
                .into_response()
        }
    }
}
