//! End-to-end API tests over an in-memory store.

use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use hostel_api::config::BootstrapAdmin;
use hostel_api::store::MemoryStore;
use hostel_api::{build_router, AppState};

async fn server() -> TestServer {
    let state = AppState::new(Arc::new(MemoryStore::new()), BootstrapAdmin::default());
    state.registry.ensure_bootstrap().await.unwrap();
    state.registry.sweep_expired().await.unwrap();
    TestServer::new(build_router(state)).unwrap()
}

fn bearer(username: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {username}")).unwrap()
}

#[tokio::test]
async fn health_check() {
    let server = server().await;
    let res = server.get("/api/health").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn bootstrap_admin_logs_in_on_fresh_store() {
    let server = server().await;
    let res = server
        .post("/api/auth/login")
        .json(&json!({"username": "Kvv", "password": "Kvv08072001"}))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["token"], "Kvv");
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["status"], "active");
}

#[tokio::test]
async fn register_then_login_awaits_approval() {
    let server = server().await;
    let res = server
        .post("/api/auth/register")
        .json(&json!({"username": "alice", "password": "pw"}))
        .await;
    assert_eq!(res.status_code(), StatusCode::CREATED);
    let body: Value = res.json();
    assert_eq!(body["username"], "alice");

    let res = server
        .post("/api/auth/login")
        .json(&json!({"username": "alice", "password": "pw"}))
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
    let body: Value = res.json();
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn register_rejects_missing_fields_and_duplicates() {
    let server = server().await;
    let res = server.post("/api/auth/register").json(&json!({})).await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);

    server
        .post("/api/auth/register")
        .json(&json!({"username": "alice", "password": "pw"}))
        .await;
    let res = server
        .post("/api/auth/register")
        .json(&json!({"username": "alice", "password": "other"}))
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn admin_can_activate_a_pending_account() {
    let server = server().await;
    server
        .post("/api/auth/register")
        .json(&json!({"username": "alice", "password": "pw"}))
        .await;

    let res = server
        .put("/api/auth/users/alice")
        .add_header(header::AUTHORIZATION, bearer("Kvv"))
        .json(&json!({"status": "active"}))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let res = server
        .post("/api/auth/login")
        .json(&json!({"username": "alice", "password": "pw"}))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["user"]["role"], "user");
}

#[tokio::test]
async fn user_listing_is_admin_only() {
    let server = server().await;
    server
        .post("/api/auth/register")
        .json(&json!({"username": "alice", "password": "pw"}))
        .await;

    let res = server
        .get("/api/auth/users")
        .add_header(header::AUTHORIZATION, bearer("alice"))
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);

    let res = server
        .get("/api/auth/users")
        .add_header(header::AUTHORIZATION, bearer("Kvv"))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert!(body["users"]["Kvv"].is_object());
    assert!(body["users"]["alice"].is_object());
}

#[tokio::test]
async fn bootstrap_admin_cannot_be_deleted() {
    let server = server().await;
    let res = server
        .delete("/api/auth/users/Kvv")
        .add_header(header::AUTHORIZATION, bearer("Kvv"))
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
    let body: Value = res.json();
    assert_eq!(body["error"], "Cannot delete main admin");
}

#[tokio::test]
async fn rooms_require_a_credential() {
    let server = server().await;
    let res = server.get("/api/rooms").await;
    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);

    let res = server
        .get("/api/rooms")
        .add_header(header::AUTHORIZATION, bearer("nobody"))
        .await;
    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_missing_room_is_404() {
    let server = server().await;
    let res = server
        .put("/api/rooms/999")
        .add_header(header::AUTHORIZATION, bearer("Kvv"))
        .json(&json!({"number": 999}))
        .await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn room_profiles_are_partitioned_per_account() {
    let server = server().await;
    server
        .post("/api/auth/register")
        .json(&json!({"username": "alice", "password": "pw"}))
        .await;

    // Status gating happens at login only, so the freshly-registered
    // (still pending) account can already use its data endpoints.
    let payload = json!({
        "rooms": [{"number": 101, "beds": 4}],
        "bedsState": {"101-1": "taken"},
        "residents": [{"name": "Ivan"}],
        "bedNumbers": {"101": 4}
    });
    let res = server
        .post("/api/rooms")
        .add_header(header::AUTHORIZATION, bearer("alice"))
        .json(&payload)
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let res = server
        .get("/api/rooms")
        .add_header(header::AUTHORIZATION, bearer("alice"))
        .await;
    let body: Value = res.json();
    assert_eq!(body, payload);

    // Invisible to the admin's own profile
    let res = server
        .get("/api/rooms")
        .add_header(header::AUTHORIZATION, bearer("Kvv"))
        .await;
    let body: Value = res.json();
    assert_eq!(body["rooms"], json!([]));
}

#[tokio::test]
async fn single_room_create_and_delete() {
    let server = server().await;
    let res = server
        .post("/api/rooms")
        .add_header(header::AUTHORIZATION, bearer("Kvv"))
        .json(&json!({"number": 101, "beds": 4}))
        .await;
    assert_eq!(res.status_code(), StatusCode::CREATED);
    let body: Value = res.json();
    assert_eq!(body["room"]["number"], 101);

    let res = server
        .delete("/api/rooms/1")
        .add_header(header::AUTHORIZATION, bearer("Kvv"))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let res = server
        .delete("/api/rooms/1")
        .add_header(header::AUTHORIZATION, bearer("Kvv"))
        .await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wiping_all_rooms_is_admin_only_and_global() {
    let server = server().await;
    server
        .post("/api/auth/register")
        .json(&json!({"username": "alice", "password": "pw"}))
        .await;
    server
        .post("/api/rooms")
        .add_header(header::AUTHORIZATION, bearer("alice"))
        .json(&json!({"rooms": [{"number": 1}]}))
        .await;

    let res = server
        .delete("/api/rooms/all")
        .add_header(header::AUTHORIZATION, bearer("alice"))
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);

    let res = server
        .delete("/api/rooms/all")
        .add_header(header::AUTHORIZATION, bearer("Kvv"))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let res = server
        .get("/api/rooms")
        .add_header(header::AUTHORIZATION, bearer("alice"))
        .await;
    let body: Value = res.json();
    assert_eq!(body["rooms"], json!([]));
}

#[tokio::test]
async fn staff_creates_get_distinct_ids_and_both_list() {
    let server = server().await;
    let res = server
        .post("/api/staff")
        .add_header(header::AUTHORIZATION, bearer("Kvv"))
        .json(&json!({"name": "Anna", "position": "cleaner", "rate": 1500}))
        .await;
    assert_eq!(res.status_code(), StatusCode::CREATED);
    let first: Value = res.json();

    let res = server
        .post("/api/staff")
        .add_header(header::AUTHORIZATION, bearer("Kvv"))
        .json(&json!({"name": "Boris", "position": "manager", "rate": 2500}))
        .await;
    let second: Value = res.json();

    let id1 = first["id"].as_str().unwrap();
    let id2 = second["id"].as_str().unwrap();
    assert!(!id1.is_empty());
    assert_ne!(id1, id2);

    let res = server
        .get("/api/staff")
        .add_header(header::AUTHORIZATION, bearer("Kvv"))
        .await;
    let body: Value = res.json();
    assert_eq!(body["staff"][id1]["name"], "Anna");
    assert_eq!(body["staff"][id2]["name"], "Boris");
}

#[tokio::test]
async fn staff_roster_is_shared_and_ungated() {
    let server = server().await;
    server
        .post("/api/auth/register")
        .json(&json!({"username": "alice", "password": "pw"}))
        .await;

    // A non-admin account mutates a record the admin created
    let res = server
        .post("/api/staff")
        .add_header(header::AUTHORIZATION, bearer("Kvv"))
        .json(&json!({"name": "Anna"}))
        .await;
    let created: Value = res.json();
    let id = created["id"].as_str().unwrap();

    let res = server
        .put(&format!("/api/staff/{id}"))
        .add_header(header::AUTHORIZATION, bearer("alice"))
        .json(&json!({"name": "Anna", "position": "head cleaner"}))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let res = server
        .delete(&format!("/api/staff/{id}"))
        .add_header(header::AUTHORIZATION, bearer("alice"))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let res = server
        .delete(&format!("/api/staff/{id}"))
        .add_header(header::AUTHORIZATION, bearer("alice"))
        .await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
}
