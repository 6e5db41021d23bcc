use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::auth::claims::AuthUser;
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;
use db::models::{Course, Role};

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct UserCoursesResponse {
    pub user: UserSummary,
    pub courses: Vec<Course>,
}

/// GET /user-courses/{user_id}
///
/// Lists a user's purchased courses. Self-only: the caller must be that user,
/// unless they are an admin.
pub async fn user_courses(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<String>,
) -> Response {
    if claims.sub != user_id && claims.role != Role::Admin {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Empty>::error("You can only view your own courses")),
        )
            .into_response();
    }

    let doc = app_state.store().read().await;

    let Some(user) = doc.user(&user_id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("User not found")),
        )
            .into_response();
    };

    let courses: Vec<Course> = doc
        .courses
        .iter()
        .filter(|course| user.purchased_courses.contains(&course.id))
        .cloned()
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            UserCoursesResponse {
                user: UserSummary {
                    id: user.id.clone(),
                    username: user.username.clone(),
                    email: user.email.clone(),
                },
                courses,
            },
            "Purchased courses fetched successfully",
        )),
    )
        .into_response()
}

#[derive(Debug, Serialize)]
pub struct TeacherSummary {
    pub id: String,
    pub fullname: String,
}

#[derive(Debug, Serialize)]
pub struct TeacherCoursesResponse {
    pub teacher: TeacherSummary,
    pub courses: Vec<Course>,
}

/// GET /teachers/{teacher_id}/courses
///
/// Public listing of the courses a teacher runs.
pub async fn teacher_courses(
    State(app_state): State<AppState>,
    Path(teacher_id): Path<String>,
) -> Response {
    let doc = app_state.store().read().await;

    let Some(teacher) = doc.teacher(&teacher_id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("Teacher not found")),
        )
            .into_response();
    };

    let courses: Vec<Course> = doc
        .courses
        .iter()
        .filter(|course| teacher.course_ids.contains(&course.id))
        .cloned()
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            TeacherCoursesResponse {
                teacher: TeacherSummary {
                    id: teacher.id.clone(),
                    fullname: teacher.fullname.clone(),
                },
                courses,
            },
            "Teacher courses fetched successfully",
        )),
    )
        .into_response()
}
