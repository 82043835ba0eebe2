//! Staff roster endpoints. Authenticated but not role-gated: any
//! account may read or mutate any record.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::AppState;

pub async fn list_staff(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
) -> ApiResult<Json<Value>> {
    let staff = state.staff.list().await;
    Ok(Json(json!({ "staff": staff })))
}

pub async fn create_staff(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Json(record): Json<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let (id, employee) = state.staff.create(record).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Employee created successfully",
            "employee": employee,
            "id": id,
        })),
    ))
}

pub async fn update_staff(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    AuthUser(_caller): AuthUser,
    Json(record): Json<Value>,
) -> ApiResult<Json<Value>> {
    let employee = state.staff.update(&employee_id, record).await?;
    Ok(Json(json!({
        "message": "Employee updated successfully",
        "employee": employee,
    })))
}

pub async fn delete_staff(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    AuthUser(_caller): AuthUser,
) -> ApiResult<Json<Value>> {
    state.staff.delete(&employee_id).await?;
    Ok(Json(json!({ "message": "Employee deleted successfully" })))
}
