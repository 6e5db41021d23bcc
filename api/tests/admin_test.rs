mod helpers;

use axum::http::StatusCode;
use helpers::*;
use serde_json::json;

#[tokio::test]
async fn ban_blocks_login_and_unban_restores_it() {
    let ctx = make_app();
    let admin = seed_admin(&ctx.store, "root", "admin-password").await;
    let user = seed_user(&ctx.store, "alice", "pw-alice-123").await;
    let admin_token = token_for(&admin);

    let (status, _) = post(
        &ctx.app,
        "/ban",
        Some(&admin_token),
        json!({"target_id": user.id, "is_banned": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(ctx.store.read().await.user(&user.id).unwrap().is_banned);

    let login = json!({"username": "alice", "password": "pw-alice-123"});
    let (status, _) = post(&ctx.app, "/login", None, login.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = post(
        &ctx.app,
        "/ban",
        Some(&admin_token),
        json!({"target_id": user.id, "is_banned": false}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(&ctx.app, "/login", None, login).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn teachers_can_be_banned_too() {
    let ctx = make_app();
    let admin = seed_admin(&ctx.store, "root", "admin-password").await;
    let teacher = seed_teacher(&ctx.store, "bob", vec![]).await;

    let (status, body) = post(
        &ctx.app,
        "/ban",
        Some(&token_for(&admin)),
        json!({"target_id": teacher.id, "is_banned": true, "target_type": "teacher"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["target_type"], "teacher");
    assert!(ctx.store.read().await.teacher(&teacher.id).unwrap().is_banned);
}

#[tokio::test]
async fn ban_requires_an_existing_target() {
    let ctx = make_app();
    let admin = seed_admin(&ctx.store, "root", "admin-password").await;

    let (status, body) = post(
        &ctx.app,
        "/ban",
        Some(&token_for(&admin)),
        json!({"target_id": "no-such-user", "is_banned": true}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn ban_rejects_unknown_target_types() {
    let ctx = make_app();
    let admin = seed_admin(&ctx.store, "root", "admin-password").await;

    let (status, body) = post(
        &ctx.app,
        "/ban",
        Some(&token_for(&admin)),
        json!({"target_id": "whoever", "is_banned": true, "target_type": "course"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Target type must be user or teacher");
}

#[tokio::test]
async fn discounts_always_compute_from_the_original_price() {
    let ctx = make_app();
    let admin = seed_admin(&ctx.store, "root", "admin-password").await;
    let course = seed_course(&ctx.store, "Intro to Rust", 100.0).await;
    let admin_token = token_for(&admin);
    let path = format!("/offs/{}", course.id);

    let (status, body) = post(&ctx.app, &path, Some(&admin_token), json!({"percentage": 20})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["new_price"], 80.0);

    // The second discount replaces the first against the original 100, so
    // 50% lands on 50, not on 40.
    let (status, body) = post(&ctx.app, &path, Some(&admin_token), json!({"percentage": 50})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["new_price"], 50.0);

    let doc = ctx.store.read().await;
    let stored = doc.course(&course.id).unwrap();
    assert_eq!(stored.price, 50.0);
    assert_eq!(stored.original_price, Some(100.0));
    assert_eq!(stored.discount, 50);
}

#[tokio::test]
async fn discount_all_hits_every_course() {
    let ctx = make_app();
    let admin = seed_admin(&ctx.store, "root", "admin-password").await;
    seed_course(&ctx.store, "Course 1", 100.0).await;
    seed_course(&ctx.store, "Course 2", 200.0).await;

    let (status, body) = post(
        &ctx.app,
        "/offs/all",
        Some(&token_for(&admin)),
        json!({"percentage": 10}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("2 courses"));

    let doc = ctx.store.read().await;
    assert_eq!(doc.courses[0].price, 90.0);
    assert_eq!(doc.courses[1].price, 180.0);
}

#[tokio::test]
async fn discount_needs_an_existing_course() {
    let ctx = make_app();
    let admin = seed_admin(&ctx.store, "root", "admin-password").await;

    let (status, body) = post(
        &ctx.app,
        "/offs/no-such-course",
        Some(&token_for(&admin)),
        json!({"percentage": 10}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Course not found");
}

#[tokio::test]
async fn discount_percentage_is_bounded() {
    let ctx = make_app();
    let admin = seed_admin(&ctx.store, "root", "admin-password").await;
    let course = seed_course(&ctx.store, "Intro to Rust", 100.0).await;

    let (status, body) = post(
        &ctx.app,
        &format!("/offs/{}", course.id),
        Some(&token_for(&admin)),
        json!({"percentage": 150}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("between 0 and 100")
    );
    assert_eq!(ctx.store.read().await.course(&course.id).unwrap().price, 100.0);
}
