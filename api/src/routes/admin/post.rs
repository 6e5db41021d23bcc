use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::response::{ApiResponse, Empty};
use crate::routes::common::format_validation_errors;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct BanRequest {
    #[validate(length(min = 1, message = "Target id is required"))]
    pub target_id: String,

    pub is_banned: bool,

    /// `user` or `teacher`.
    #[serde(default = "default_target_type")]
    pub target_type: String,
}

fn default_target_type() -> String {
    "user".into()
}

#[derive(Debug, Serialize)]
pub struct BanResponse {
    pub target_id: String,
    pub target_type: String,
    pub is_banned: bool,
}

/// POST /ban
///
/// Flips the ban flag on a user or teacher. A banned account keeps its data;
/// it just cannot log in or refresh until unbanned.
pub async fn ban(State(app_state): State<AppState>, Json(req): Json<BanRequest>) -> Response {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(error_message)),
        )
            .into_response();
    }

    if req.target_type != "user" && req.target_type != "teacher" {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error("Target type must be user or teacher")),
        )
            .into_response();
    }

    let BanRequest {
        target_id,
        is_banned,
        target_type,
    } = req;

    let found = app_state
        .store()
        .mutate({
            let target_id = target_id.clone();
            let target_type = target_type.clone();
            move |doc| {
                if target_type == "teacher" {
                    match doc.teacher_mut(&target_id) {
                        Some(teacher) => {
                            teacher.is_banned = is_banned;
                            true
                        }
                        None => false,
                    }
                } else {
                    match doc.user_mut(&target_id) {
                        Some(user) => {
                            user.is_banned = is_banned;
                            true
                        }
                        None => false,
                    }
                }
            }
        })
        .await;

    match found {
        Ok(true) => {
            let action = if is_banned { "banned" } else { "unbanned" };
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    BanResponse {
                        target_id,
                        target_type: target_type.clone(),
                        is_banned,
                    },
                    format!("The {target_type} was {action}"),
                )),
            )
                .into_response()
        }
        Ok(false) => {
            let message = if target_type == "teacher" {
                "Teacher not found"
            } else {
                "User not found"
            };
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Empty>::error(message)),
            )
                .into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to persist ban change");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to persist ban change")),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct DiscountRequest {
    #[validate(range(max = 100, message = "Discount percentage must be between 0 and 100"))]
    pub percentage: u32,
}

#[derive(Debug, Serialize)]
pub struct DiscountResponse {
    pub new_price: f64,
}

/// POST /offs/all
///
/// Applies a percentage discount to every course, always computed against
/// each course's original price. The whole batch is one store mutation, so
/// either every course is updated and persisted or none are.
pub async fn discount_all_courses(
    State(app_state): State<AppState>,
    Json(req): Json<DiscountRequest>,
) -> Response {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(error_message)),
        )
            .into_response();
    }

    let percentage = req.percentage;
    let updated = app_state
        .store()
        .mutate(move |doc| {
            for course in doc.courses.iter_mut() {
                course.apply_discount(percentage);
            }
            doc.courses.len()
        })
        .await;

    match updated {
        Ok(count) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Empty,
                format!("Discount of {percentage}% applied to {count} courses"),
            )),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to persist discounts");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to persist discounts")),
            )
                .into_response()
        }
    }
}

/// POST /offs/{course_id}
///
/// Applies a percentage discount to a single course, computed against its
/// original price; re-discounting never compounds.
pub async fn discount_course(
    State(app_state): State<AppState>,
    Path(course_id): Path<String>,
    Json(req): Json<DiscountRequest>,
) -> Response {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(error_message)),
        )
            .into_response();
    }

    let percentage = req.percentage;
    let new_price = app_state
        .store()
        .mutate(move |doc| {
            let course = doc.course_mut(&course_id)?;
            course.apply_discount(percentage);
            Some(course.price)
        })
        .await;

    match new_price {
        Ok(Some(new_price)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                DiscountResponse { new_price },
                format!("Discount of {percentage}% applied"),
            )),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("Course not found")),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to persist discount");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to persist discount")),
            )
                .into_response()
        }
    }
}
