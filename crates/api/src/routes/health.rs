//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;
use crate::middleware::metrics::record_connection_pool_metrics;

/// Liveness response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Readiness response with database connectivity details.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ReadyResponse {
    pub status: String,
    pub database: DatabaseHealth,
}

/// Database health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseHealth {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Liveness probe endpoint.
///
/// Returns 200 OK if the process is running; never touches the database.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Returns 200 OK if the service can accept traffic (database connected).
/// Also refreshes the connection pool gauges, so scraping /health/ready
/// keeps them current without a dedicated collector task.
pub async fn ready(State(state): State<AppState>) -> Result<Json<ReadyResponse>, StatusCode> {
    let start = std::time::Instant::now();
    let db_connected = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    let latency_ms = start.elapsed().as_millis() as u64;

    record_connection_pool_metrics(state.pool.size(), state.pool.num_idle() as u32);

    if db_connected {
        Ok(Json(ReadyResponse {
            status: "ready".to_string(),
            database: DatabaseHealth {
                connected: true,
                latency_ms: Some(latency_ms),
            },
        }))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_reports_version() {
        let Json(response) = health_check().await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_ready_response_serialization() {
        let response = ReadyResponse {
            status: "ready".to_string(),
            database: DatabaseHealth {
                connected: true,
                latency_ms: Some(3),
            },
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""status":"ready""#));
        assert!(json.contains(r#""latency_ms":3"#));
    }

    #[test]
    fn test_database_health_omits_latency_when_absent() {
        let health = DatabaseHealth {
            connected: false,
            latency_ms: None,
        };
        let json = serde_json::to_string(&health).unwrap();
        assert!(!json.contains("latency_ms"));
    }
}
