use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::state::AppState;

const DATABASE_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut response = HealthResponse {
        status: "healthy".to_string(),
        store: state.config.store_backend().to_string(),
        database: None,
    };

    if let Some(pool) = &state.db_pool {
        let check = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool);
        match tokio::time::timeout(DATABASE_CHECK_TIMEOUT, check).await {
            Ok(Ok(_)) => response.database = Some("healthy".to_string()),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Database health check failed");
                response.database = Some(format!("unhealthy: {}", e));
                response.status = "unhealthy".to_string();
            }
            Err(_) => {
                tracing::error!("Database health check timed out");
                response.database = Some("unhealthy: timeout".to_string());
                response.status = "unhealthy".to_string();
            }
        }
    }

    let status = if response.status == "healthy" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
