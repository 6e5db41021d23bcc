#![allow(dead_code)]

use api::auth::generate_jwt;
use api::routes::app;
use api::state::AppState;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use ctor::ctor;
use db::Store;
use db::models::{Course, Role, Session, Teacher, User, user::hash_password};
use serde_json::Value;
use tower::ServiceExt;
use util::config::AppConfig;

#[ctor]
fn setup_tests() {
    let upload_root =
        std::env::temp_dir().join(format!("opencourse-test-uploads-{}", std::process::id()));
    AppConfig::set_jwt_secret("integration-test-secret");
    AppConfig::set_jwt_duration_minutes(60);
    AppConfig::set_upload_root(upload_root.to_string_lossy().to_string());
}

pub struct TestApp {
    pub app: Router,
    pub store: Store,
}

/// Builds the full application router over a fresh in-memory store.
pub fn make_app() -> TestApp {
    let store = Store::in_memory();
    let app = app(AppState::new(store.clone()));
    TestApp { app, store }
}

pub async fn seed_user(store: &Store, username: &str, password: &str) -> User {
    let user = User::new(
        username,
        hash_password(password).unwrap(),
        format!("{username}@example.com"),
        username,
        "0820000000",
    );
    let row = user.clone();
    store.mutate(move |doc| doc.users.push(row)).await.unwrap();
    user
}

pub async fn seed_admin(store: &Store, username: &str, password: &str) -> User {
    let mut admin = User::new(
        username,
        hash_password(password).unwrap(),
        format!("{username}@example.com"),
        username,
        "0820000000",
    );
    admin.role = Role::Admin;
    let row = admin.clone();
    store.mutate(move |doc| doc.users.push(row)).await.unwrap();
    admin
}

pub async fn seed_teacher(store: &Store, username: &str, course_ids: Vec<String>) -> Teacher {
    let teacher = Teacher::new(
        username,
        hash_password("teacher-password").unwrap(),
        format!("{username}@example.com"),
        username,
        "0830000000",
        course_ids,
        vec!["rust".into()],
    );
    let row = teacher.clone();
    store
        .mutate(move |doc| doc.teachers.push(row))
        .await
        .unwrap();
    teacher
}

pub async fn seed_course(store: &Store, title: &str, price: f64) -> Course {
    let course = Course::new(title, price);
    let row = course.clone();
    store
        .mutate(move |doc| doc.courses.push(row))
        .await
        .unwrap();
    course
}

pub async fn seed_session(store: &Store, course_id: &str) -> Session {
    let session = Session::new(course_id, "Lesson 1");
    let row = session.clone();
    store
        .mutate(move |doc| doc.sessions.push(row))
        .await
        .unwrap();
    session
}

pub fn token_for(user: &User) -> String {
    generate_jwt(&user.id, user.role).0
}

pub fn teacher_token(teacher: &Teacher) -> String {
    generate_jwt(&teacher.id, teacher.role).0
}

/// Sends one request through the router and decodes the JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

pub async fn get(app: &Router, path: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, "GET", path, token, None).await
}

pub async fn post(
    app: &Router,
    path: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    send(app, "POST", path, token, Some(body)).await
}
