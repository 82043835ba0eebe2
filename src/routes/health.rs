//! Health check endpoint

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "Hostel Manager API is running",
        "timestamp": chrono::Local::now().to_rfc3339(),
    }))
}
