//! Health check endpoint

use axum::Json;
use chrono::Utc;
use toastspeech_shared::types::HealthResponse;

/// Basic health check; never touches the provider
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_returns_ok() {
        let before = Utc::now();
        let response = health_check().await;

        assert_eq!(response.status, "ok");
        assert!(response.timestamp >= before);
    }
}
