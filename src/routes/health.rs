use axum::response::Json;
use chrono::Utc;
use serde::Serialize;

const SERVICE_NAME: &str = "SCORETURK API";

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    timestamp: i64,
}

// GET /health - Process liveness with server time (unix seconds)
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        timestamp: Utc::now().timestamp(),
    })
}
