use axum::{
    Json,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::auth::decode_token;
use crate::response::ApiResponse;

#[derive(Debug, Serialize, Default)]
pub struct TokenStatus {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// GET /validate/token
///
/// Token introspection, separate from the auth gate's enforcement: a missing
/// token is `401`, but a presented token always gets a `200` with a boolean
/// verdict. Callers poll this to decide whether to re-login, so an expired
/// token is an answer here, not an error.
pub async fn validate_token(headers: HeaderMap) -> Response {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<TokenStatus>::error("No token provided")),
        )
            .into_response();
    };

    match decode_token(token) {
        Ok(claims) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                TokenStatus {
                    valid: true,
                    user_id: Some(claims.sub),
                },
                "Token is valid",
            )),
        )
            .into_response(),
        Err(_) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                TokenStatus {
                    valid: false,
                    user_id: None,
                },
                "Token is expired or invalid",
            )),
        )
            .into_response(),
    }
}
