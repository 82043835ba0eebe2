//! Registration, login and admin account management endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::models::AccountPatch;
use crate::AppState;

/// Login/registration body. Fields are validated by the components so
/// a missing field answers 400, not a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let username = state
        .registry
        .register(
            body.username.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful",
            "username": username,
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> ApiResult<Json<Value>> {
    let outcome = state
        .auth
        .login(
            body.username.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(json!({
        "message": "Login successful",
        // The credential for subsequent calls is the account id itself
        "token": outcome.username,
        "user": {
            "username": outcome.username,
            "role": outcome.role,
            "status": outcome.status,
        },
    })))
}

pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Json<Value>> {
    state.auth.require_admin(&caller).await?;
    let users = state.registry.list_accounts().await;
    Ok(Json(json!({ "users": users })))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    AuthUser(caller): AuthUser,
    Json(patch): Json<AccountPatch>,
) -> ApiResult<Json<Value>> {
    state.auth.require_admin(&caller).await?;
    let user = state.registry.update_account(&username, patch).await?;
    Ok(Json(json!({
        "message": "User updated successfully",
        "user": user,
    })))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Json<Value>> {
    state.auth.require_admin(&caller).await?;
    state.registry.delete_account(&username).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
