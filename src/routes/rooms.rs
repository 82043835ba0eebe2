//! Per-account room profile endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::tenant::SaveOutcome;
use crate::AppState;

pub async fn get_rooms(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.tenants.get_profile(&caller).await))
}

pub async fn create_room(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    match state.tenants.save_profile(&caller, payload).await? {
        SaveOutcome::Bulk => Ok((
            StatusCode::OK,
            Json(json!({ "message": "All rooms data saved successfully" })),
        )),
        SaveOutcome::Room { room, .. } => Ok((
            StatusCode::CREATED,
            Json(json!({
                "message": "Room created successfully",
                "room": room,
            })),
        )),
    }
}

pub async fn update_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<Value>,
) -> ApiResult<Json<Value>> {
    let room = state.tenants.update_room(&caller, &room_id, payload).await?;
    Ok(Json(json!({
        "message": "Room updated successfully",
        "room": room,
    })))
}

pub async fn delete_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Json<Value>> {
    state.tenants.delete_room(&caller, &room_id).await?;
    Ok(Json(json!({ "message": "Room deleted successfully" })))
}

pub async fn delete_all_rooms(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Json<Value>> {
    state.auth.require_admin(&caller).await?;
    state.tenants.delete_all().await?;
    Ok(Json(json!({ "message": "All rooms deleted successfully" })))
}
