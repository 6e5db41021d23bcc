use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::response::{ApiResponse, Empty};
use crate::state::AppState;
use util::paths;

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png"];
const VIDEO_TYPES: &[&str] = &["video/mp4"];

#[derive(Debug, Serialize)]
pub struct ImageUploadResponse {
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct VideoUploadResponse {
    pub video_url: String,
}

/// One file field pulled out of a multipart body.
struct UploadedFile {
    filename: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

/// POST /upload-course-image
///
/// Multipart form: `courseId` (text) and `courseImage` (JPEG or PNG file).
/// The file is stored under the upload root with a generated name keeping
/// the original extension, and its public path is written to the course.
///
/// ### Responses
/// - `200 OK`: `{ "image_url": "/uploads/courses/<uuid>.png" }`
/// - `400 Bad Request`: missing field, empty file, or unsupported type
/// - `404 Not Found`: unknown course
pub async fn upload_course_image(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let mut course_id: Option<String> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        match field.name().unwrap_or("") {
            "courseId" => {
                course_id = field.text().await.ok();
            }
            "courseImage" => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => {
                        file = Some(UploadedFile {
                            filename,
                            content_type,
                            data: bytes.to_vec(),
                        });
                    }
                    Err(_) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(ApiResponse::<Empty>::error("Failed to read uploaded file")),
                        )
                            .into_response();
                    }
                }
            }
            _ => {}
        }
    }

    let Some(course_id) = course_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error("Missing course id")),
        )
            .into_response();
    };

    let file = match checked_file(file, IMAGE_TYPES) {
        Ok(file) => file,
        Err(response) => return response,
    };

    if app_state.store().read().await.course(&course_id).is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("Course not found")),
        )
            .into_response();
    }

    let filename = stored_filename(file.filename.as_deref());
    let disk_path = match save_file(paths::course_image_dir(), &filename, &file.data) {
        Ok(path) => path,
        Err(response) => return response,
    };

    let image_url = paths::course_image_url(&filename);
    let assigned = app_state
        .store()
        .mutate({
            let image_url = image_url.clone();
            move |doc| {
                let course = doc.course_mut(&course_id)?;
                course.image = Some(image_url);
                Some(())
            }
        })
        .await;

    match assigned {
        Ok(Some(())) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ImageUploadResponse { image_url },
                "File uploaded successfully",
            )),
        )
            .into_response(),
        Ok(None) => {
            // The course vanished between the check and the write.
            let _ = fs::remove_file(disk_path);
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Empty>::error("Course not found")),
            )
                .into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to persist image path");
            let _ = fs::remove_file(disk_path);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to persist image path")),
            )
                .into_response()
        }
    }
}

/// POST /upload-session-video
///
/// Multipart form: `sessionId` (text) and `video` (MP4 file). Mirrors the
/// course-image upload, landing under the videos directory and writing the
/// public path onto the session record.
pub async fn upload_session_video(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let mut session_id: Option<String> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        match field.name().unwrap_or("") {
            "sessionId" => {
                session_id = field.text().await.ok();
            }
            "video" => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => {
                        file = Some(UploadedFile {
                            filename,
                            content_type,
                            data: bytes.to_vec(),
                        });
                    }
                    Err(_) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(ApiResponse::<Empty>::error("Failed to read uploaded file")),
                        )
                            .into_response();
                    }
                }
            }
            _ => {}
        }
    }

    let Some(session_id) = session_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error("Missing session id")),
        )
            .into_response();
    };

    let file = match checked_file(file, VIDEO_TYPES) {
        Ok(file) => file,
        Err(response) => return response,
    };

    {
        let doc = app_state.store().read().await;
        if !doc.sessions.iter().any(|s| s.id == session_id) {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Empty>::error("Session not found")),
            )
                .into_response();
        }
    }

    let filename = stored_filename(file.filename.as_deref());
    let disk_path = match save_file(paths::session_video_dir(), &filename, &file.data) {
        Ok(path) => path,
        Err(response) => return response,
    };

    let video_url = paths::session_video_url(&filename);
    let assigned = app_state
        .store()
        .mutate({
            let video_url = video_url.clone();
            move |doc| {
                let session = doc.session_mut(&session_id)?;
                session.video_url = Some(video_url);
                Some(())
            }
        })
        .await;

    match assigned {
        Ok(Some(())) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                VideoUploadResponse { video_url },
                "File uploaded successfully",
            )),
        )
            .into_response(),
        Ok(None) => {
            let _ = fs::remove_file(disk_path);
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Empty>::error("Session not found")),
            )
                .into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to persist video path");
            let _ = fs::remove_file(disk_path);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to persist video path")),
            )
                .into_response()
        }
    }
}

/// Rejects missing, empty, and wrongly-typed files in one place.
fn checked_file(file: Option<UploadedFile>, allowed: &[&str]) -> Result<UploadedFile, Response> {
    let Some(file) = file else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error("No file uploaded")),
        )
            .into_response());
    };

    if file.data.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error("Empty file provided")),
        )
            .into_response());
    }

    let type_ok = file
        .content_type
        .as_deref()
        .is_some_and(|t| allowed.contains(&t));
    if !type_ok {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error("Unsupported file type")),
        )
            .into_response());
    }

    Ok(file)
}

/// Generated storage name: a fresh uuid keeping the original extension.
fn stored_filename(original: Option<&str>) -> String {
    let id = Uuid::new_v4();
    match original.and_then(|name| Path::new(name).extension()) {
        Some(ext) => format!("{id}.{}", ext.to_string_lossy()),
        None => id.to_string(),
    }
}

fn save_file(dir: PathBuf, filename: &str, data: &[u8]) -> Result<PathBuf, Response> {
    let write = paths::ensure_dir(&dir).and_then(|dir| {
        let path = dir.join(filename);
        fs::write(&path, data).map(|_| path)
    });

    write.map_err(|err| {
        tracing::error!(error = %err, "Failed to save uploaded file");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Empty>::error("Failed to save file")),
        )
            .into_response()
    })
}

#[cfg(test)]
mod tests {
    use super::stored_filename;

    #[test]
    fn stored_names_keep_the_original_extension() {
        let name = stored_filename(Some("lesson one.MP4"));
        assert!(name.ends_with(".MP4"));
        assert!(name.len() > ".MP4".len());
    }

    #[test]
    fn extensionless_uploads_get_a_bare_uuid() {
        let name = stored_filename(Some("README"));
        assert!(!name.contains('.'));

        let name = stored_filename(None);
        assert!(!name.contains('.'));
    }
}
