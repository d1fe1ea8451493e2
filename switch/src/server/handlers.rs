//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::SwitchError;
use crate::models::sim::SimStatus;
use crate::reconcile::reconciler::ReconcileOutcome;
use crate::server::state::ServerState;
use crate::utils::version_info;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "simswitch".to_string(),
        version: version.version,
    })
}

/// Version response
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    let version = version_info();
    Json(VersionResponse {
        version: version.version,
        git_hash: version.git_hash,
        build_time: version.build_time,
    })
}

/// Error body returned for every non-2xx response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Requested status change for a SIM
#[derive(Debug, Deserialize)]
pub struct SimStatusRequest {
    pub status: String,
}

/// List every SIM on the account, straight from the provider
pub async fn list_sims_handler(State(state): State<Arc<ServerState>>) -> Response {
    match state.registry.fetch_all().await {
        Ok(sims) => (StatusCode::OK, Json(sims)).into_response(),
        Err(err) => provider_error(err),
    }
}

/// Look up the SIM labeled with a device serial
pub async fn get_sim_handler(
    State(state): State<Arc<ServerState>>,
    Path(serial): Path<String>,
) -> Response {
    match state.directory.lookup(&serial).await {
        Ok(Some(sim)) => (StatusCode::OK, Json(sim)).into_response(),
        Ok(None) => not_found(&serial),
        Err(err) => provider_error(err),
    }
}

/// Reconcile the SIM labeled with a device serial to a requested status
pub async fn put_sim_handler(
    State(state): State<Arc<ServerState>>,
    Path(serial): Path<String>,
    Json(request): Json<SimStatusRequest>,
) -> Response {
    let desired = SimStatus::parse(&request.status);

    match state.reconciler.reconcile(&serial, desired).await {
        Ok(ReconcileOutcome::Updated(sim)) => (StatusCode::OK, Json(sim)).into_response(),
        Ok(ReconcileOutcome::NoChange(sim)) => (StatusCode::ACCEPTED, Json(sim)).into_response(),
        Ok(ReconcileOutcome::NotFound) => not_found(&serial),
        Err(err) => provider_error(err),
    }
}

fn not_found(serial: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("No SIM labeled '{}'", serial),
        }),
    )
        .into_response()
}

fn provider_error(err: SwitchError) -> Response {
    match err {
        SwitchError::ProviderError(message) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse { error: message }),
        )
            .into_response(),
        SwitchError::HttpError(err) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response(),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: other.to_string(),
            }),
        )
            .into_response(),
    }
}
