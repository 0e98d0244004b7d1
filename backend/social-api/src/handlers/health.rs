use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::metrics;

/// GET /ping
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "pong" }))
}

/// Liveness plus a database round trip when PostgreSQL backs the stores.
/// GET /health
pub async fn health(state: web::Data<AppState>) -> Result<HttpResponse> {
    if let Some(pool) = &state.db {
        sqlx::query("SELECT 1").execute(pool).await?;
    }
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

/// GET /metrics
pub async fn metrics_handler() -> Result<HttpResponse> {
    let body = metrics::render().map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}
