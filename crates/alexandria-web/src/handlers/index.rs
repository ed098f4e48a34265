use axum::Json;

use crate::models::{HealthResponse, StatusResponse};

pub async fn index() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Alexandria API is running",
        status: "success",
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "alexandria-backend",
    })
}
