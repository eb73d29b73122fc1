//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

use core_kernel::AdapterHealth;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger: Option<LedgerHealth>,
}

#[derive(Serialize)]
pub struct LedgerHealth {
    pub adapter: String,
    pub status: AdapterHealth,
    pub latency_ms: u64,
}

/// Liveness: the process is up
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ledger: None,
    })
}

/// Readiness: the ledger store answers
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let result = state.ledger.port().health_check().await;

    if !result.is_operational() {
        warn!(
            adapter = %result.adapter_id,
            message = result.message.as_deref().unwrap_or(""),
            "Ledger store not ready"
        );
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ledger: Some(LedgerHealth {
            adapter: result.adapter_id,
            status: result.status,
            latency_ms: result.latency_ms,
        }),
    }))
}
