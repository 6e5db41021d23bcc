//! The auth gate: one middleware in front of every route.
//!
//! Composes the route classifier, the token service, and a live role lookup
//! against the store. Runs before any handler; on success the verified
//! claims ride along in the request extensions.

use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::TypedHeader;
use headers::{Authorization, authorization::Bearer};

use crate::auth::access::{Access, classify};
use crate::auth::claims::AuthUser;
use crate::auth::{TokenError, decode_token};
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;
use db::models::Role;

/// Admits or rejects a request before it reaches its handler.
///
/// - Public routes pass through with no identity attached.
/// - A missing bearer token is `401`; a bad or expired one is `403`.
/// - Admin routes additionally require the token's subject to be an admin
///   account in the store right now: the role claim alone is not trusted,
///   and the lookup is repeated on every admin request.
pub async fn auth_gate(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let access = classify(req.method(), req.uri().path());

    if access == Access::Public {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();

    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(&mut parts, &())
            .await
            .map_err(|_| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ApiResponse::error("Authentication required")),
                )
            })?;

    let claims = decode_token(bearer.token()).map_err(|err| {
        let message = match err {
            TokenError::Expired => "Token has expired",
            TokenError::Invalid => "Invalid token",
        };
        (StatusCode::FORBIDDEN, Json(ApiResponse::error(message)))
    })?;

    if access == Access::AdminOnly {
        let is_admin = app_state
            .store()
            .read()
            .await
            .user(&claims.sub)
            .map(|account| account.role == Role::Admin)
            .unwrap_or(false);

        if !is_admin {
            return Err((
                StatusCode::FORBIDDEN,
                Json(ApiResponse::error("Admin access required")),
            ));
        }
    }

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(AuthUser(claims));
    Ok(next.run(req).await)
}
