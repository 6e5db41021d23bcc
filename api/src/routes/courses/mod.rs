//! Course listing and media upload routes. Teacher listings are public;
//! everything else requires authentication, and `/user-courses/{user_id}`
//! is additionally self-only (enforced in the handler).

pub mod get;
pub mod post;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;
use get::{teacher_courses, user_courses};
use post::{upload_course_image, upload_session_video};

/// Builds the courses/uploads route group.
pub fn courses_routes() -> Router<AppState> {
    Router::new()
        .route("/user-courses/{user_id}", get(user_courses))
        .route("/teachers/{teacher_id}/courses", get(teacher_courses))
        .route("/upload-course-image", post(upload_course_image))
        .route("/upload-session-video", post(upload_session_video))
}
