use axum::{Json, extract::State, http::StatusCode, response::IntoResponse, response::Response};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::auth::generate_jwt;
use crate::response::{ApiResponse, Empty};
use crate::routes::common::format_validation_errors;
use crate::state::AppState;
use db::models::{Role, Teacher, User, user::hash_password, user::verify_password};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Fullname is required"))]
    pub fullname: String,

    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phonenumber: String,

    /// `user` or `teacher`; admin accounts are never self-registered.
    #[serde(default = "default_role")]
    pub role: String,

    /// Teacher variant only.
    #[serde(default)]
    pub course_ids: Vec<String>,

    /// Teacher variant only: free-form skill tags.
    #[serde(default)]
    pub stack: Vec<String>,
}

fn default_role() -> String {
    "user".into()
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub role: Role,
}

/// POST /register
///
/// Register a new user or teacher account.
///
/// ### Request Body
/// ```json
/// {
///   "username": "alice",
///   "password": "strongpassword",
///   "email": "alice@example.com",
///   "fullname": "Alice Moyo",
///   "phonenumber": "0820000000",
///   "role": "user"
/// }
/// ```
///
/// ### Responses
///
/// - `201 Created`
/// ```json
/// {
///   "success": true,
///   "data": { "id": "…", "role": "user" },
///   "message": "Account registered successfully"
/// }
/// ```
///
/// - `400 Bad Request` (validation failure, bad role, or duplicate username;
///   uniqueness spans the user *and* teacher collections)
/// - `500 Internal Server Error` (hashing or persistence failure)
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(error_message)),
        )
            .into_response();
    }

    let role = match Role::from_str(&req.role) {
        Ok(role @ (Role::User | Role::Teacher)) => role,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<Empty>::error("Role must be user or teacher")),
            )
                .into_response();
        }
    };

    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::error!(error = %err, "Password hashing failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to process password")),
            )
                .into_response();
        }
    };

    // Uniqueness check and insert happen inside one mutation so a concurrent
    // register cannot slip the same username in between them.
    let created = app_state
        .store()
        .mutate(move |doc| {
            if doc.username_taken(&req.username) {
                return None;
            }
            let id = match role {
                Role::Teacher => {
                    let teacher = Teacher::new(
                        req.username,
                        password_hash,
                        req.email,
                        req.fullname,
                        req.phonenumber,
                        req.course_ids,
                        req.stack,
                    );
                    let id = teacher.id.clone();
                    doc.teachers.push(teacher);
                    id
                }
                _ => {
                    let user = User::new(
                        req.username,
                        password_hash,
                        req.email,
                        req.fullname,
                        req.phonenumber,
                    );
                    let id = user.id.clone();
                    doc.users.push(user);
                    id
                }
            };
            Some(id)
        })
        .await;

    match created {
        Ok(Some(id)) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                RegisterResponse { id, role },
                "Account registered successfully",
            )),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error("Username already taken")),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to persist new account");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to persist account")),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user_id: String,
    pub role: Role,
    pub expires_at: String,
}

/// POST /login
///
/// Authenticate against the user collection first, then the teacher
/// collection, and issue a session token.
///
/// ### Responses
///
/// - `200 OK`: token, subject id, role, and expiry
/// - `401 Unauthorized`: unknown username or wrong password (one shared
///   message; the two cases are indistinguishable to the caller)
/// - `403 Forbidden`: credentials were correct but the account is banned
pub async fn login(State(app_state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(error_message)),
        )
            .into_response();
    }

    let account = {
        let doc = app_state.store().read().await;
        doc.account_by_username(&req.username)
    };

    let Some(account) = account else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<Empty>::error("Invalid username or password")),
        )
            .into_response();
    };

    if !verify_password(&req.password, &account.password_hash) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<Empty>::error("Invalid username or password")),
        )
            .into_response();
    }

    if account.is_banned {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Empty>::error("This account has been banned")),
        )
            .into_response();
    }

    let (token, expires_at) = generate_jwt(&account.id, account.role);
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            TokenResponse {
                token,
                user_id: account.id,
                role: account.role,
                expires_at,
            },
            "Login successful",
        )),
    )
        .into_response()
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "User id is required"))]
    pub user_id: String,
}

/// POST /refresh-token
///
/// Reissue a token for an account. The role is read from the stored account,
/// never from the request, and banned accounts cannot refresh.
pub async fn refresh_token(
    State(app_state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> Response {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(error_message)),
        )
            .into_response();
    }

    let account = {
        let doc = app_state.store().read().await;
        doc.account_by_id(&req.user_id)
    };

    let Some(account) = account else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("Account not found")),
        )
            .into_response();
    };

    if account.is_banned {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Empty>::error("This account has been banned")),
        )
            .into_response();
    }

    let (token, expires_at) = generate_jwt(&account.id, account.role);
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            TokenResponse {
                token,
                user_id: account.id,
                role: account.role,
                expires_at,
            },
            "Token refreshed",
        )),
    )
        .into_response()
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// POST /forgot-password
///
/// Reset an account's password by username, whichever collection it lives in.
pub async fn forgot_password(
    State(app_state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Response {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(error_message)),
        )
            .into_response();
    }

    let password_hash = match hash_password(&req.new_password) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::error!(error = %err, "Password hashing failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to process password")),
            )
                .into_response();
        }
    };

    let changed = app_state
        .store()
        .mutate(move |doc| doc.set_password_by_username(&req.username, password_hash))
        .await;

    match changed {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty, "Password updated successfully")),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error("Account not found")),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to persist password change");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Failed to persist password change")),
            )
                .into_response()
        }
    }
}
