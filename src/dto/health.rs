use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Storage reachability as reported by `/healthcheck`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

/// Body of the `/healthcheck` route.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
}

impl From<bool> for HealthResponse {
    /// `true` when the game store answered its ping.
    fn from(store_reachable: bool) -> Self {
        let status = if store_reachable {
            HealthStatus::Ok
        } else {
            HealthStatus::Degraded
        };
        Self { status }
    }
}
