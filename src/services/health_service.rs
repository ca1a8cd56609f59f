use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Ping the game store; any failure reports the service as degraded.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.games().store().health_check().await {
        Ok(()) => HealthResponse::from(true),
        Err(err) => {
            warn!(error = %err, "storage health check failed");
            HealthResponse::from(false)
        }
    }
}
