use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::TypedHeader;
use headers::{Authorization, authorization::Bearer};

use crate::auth::claims::AuthUser;
use crate::auth::decode_token;

/// Hands verified claims to handlers.
///
/// The auth gate has already run for every non-public route and stashed the
/// claims in the request extensions; this extractor just picks them up. As a
/// fallback it resolves the bearer header itself, with the gate's status
/// split: missing header is `401`, bad token is `403`.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| (StatusCode::UNAUTHORIZED, "Authentication required"))?;

        let claims = decode_token(bearer.token())
            .map_err(|_| (StatusCode::FORBIDDEN, "Invalid or expired token"))?;

        Ok(AuthUser(claims))
    }
}
