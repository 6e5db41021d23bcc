mod helpers;

use api::auth::Claims;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use db::models::Role;
use helpers::*;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

/// Signs a claim set directly, bypassing `generate_jwt`, so tests can forge
/// expiries and role claims.
fn sign_claims(sub: &str, role: Role, exp_offset: Duration) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        role,
        exp: (Utc::now() + exp_offset).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(util::config::jwt_secret().as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let ctx = make_app();

    let (status, body) = get(&ctx.app, "/cart", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn garbage_tokens_are_forbidden_not_unauthorized() {
    let ctx = make_app();

    let (status, body) = get(&ctx.app, "/cart", Some("definitely-not-a-jwt")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn expired_tokens_are_forbidden() {
    let ctx = make_app();
    let user = seed_user(&ctx.store, "alice", "pw-alice-123").await;

    // Far enough in the past to clear the decoder's clock-skew leeway.
    let expired = sign_claims(&user.id, Role::User, Duration::minutes(-10));
    let (status, body) = get(&ctx.app, "/cart", Some(&expired)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Token has expired");
}

#[tokio::test]
async fn public_routes_need_no_identity() {
    let ctx = make_app();
    let course = seed_course(&ctx.store, "Intro to Rust", 100.0).await;
    let teacher = seed_teacher(&ctx.store, "bob", vec![course.id.clone()]).await;

    let (status, body) = get(
        &ctx.app,
        &format!("/teachers/{}/courses", teacher.id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["courses"][0]["id"], course.id);
}

#[tokio::test]
async fn unknown_paths_are_protected_by_default() {
    let ctx = make_app();

    let (status, _) = get(&ctx.app, "/definitely/not/a/route", None).await;

    // The gate answers before routing does: 401, not 404.
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_ordinary_accounts() {
    let ctx = make_app();
    let user = seed_user(&ctx.store, "alice", "pw-alice-123").await;
    let teacher = seed_teacher(&ctx.store, "bob", vec![]).await;

    for token in [token_for(&user), teacher_token(&teacher)] {
        let (status, body) = post(
            &ctx.app,
            "/ban",
            Some(&token),
            json!({"target_id": user.id, "is_banned": true}),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Admin access required");
    }
}

#[tokio::test]
async fn admin_role_claim_is_checked_against_the_store() {
    let ctx = make_app();
    let user = seed_user(&ctx.store, "alice", "pw-alice-123").await;

    // A token claiming admin for a non-admin account gets nowhere: the gate
    // checks the live record, not the claim.
    let forged = sign_claims(&user.id, Role::Admin, Duration::minutes(10));
    let (status, _) = post(
        &ctx.app,
        "/ban",
        Some(&forged),
        json!({"target_id": user.id, "is_banned": true}),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(!ctx.store.read().await.users[0].is_banned);
}

#[tokio::test]
async fn admin_tokens_for_deleted_accounts_are_rejected() {
    let ctx = make_app();

    let orphaned = sign_claims("gone-account", Role::Admin, Duration::minutes(10));
    let (status, _) = post(
        &ctx.app,
        "/ban",
        Some(&orphaned),
        json!({"target_id": "whoever", "is_banned": true}),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_accounts_pass_the_gate() {
    let ctx = make_app();
    let admin = seed_admin(&ctx.store, "root", "admin-password").await;
    let user = seed_user(&ctx.store, "alice", "pw-alice-123").await;

    let (status, _) = post(
        &ctx.app,
        "/ban",
        Some(&token_for(&admin)),
        json!({"target_id": user.id, "is_banned": true}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}
