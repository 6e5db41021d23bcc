use axum::{
    body::Body,
    extract::FromRequestParts,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::TypedHeader;
use headers::UserAgent;
use tracing::info;

use crate::auth::claims::AuthUser;

/// Logs method, path, response status, subject id (if a valid token was
/// presented), and user-agent for each handled request.
pub async fn log_request(req: Request<Body>, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let user_id = AuthUser::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|AuthUser(claims)| claims.sub);

    let user_agent = TypedHeader::<UserAgent>::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|TypedHeader(ua)| ua.to_string());

    let method = parts.method.clone();
    let path = parts.uri.path().to_string();

    let req = Request::from_parts(parts, body);
    let response = next.run(req).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        user = user_id.as_deref().unwrap_or("-"),
        user_agent = user_agent.as_deref().unwrap_or("unknown"),
        "Handled request"
    );

    response
}
