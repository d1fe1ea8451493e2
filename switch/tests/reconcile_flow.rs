//! Status reconciliation flow, including the HTTP handler mapping

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use simswitch::cache::directory::SimDirectory;
use simswitch::models::sim::{SimRecord, SimStatus};
use simswitch::provider::memory::{MemoryRegistry, RegistryCall};
use simswitch::provider::SimRegistry;
use simswitch::reconcile::reconciler::{ReconcileOutcome, SimReconciler};
use simswitch::server::handlers::{put_sim_handler, SimStatusRequest};
use simswitch::server::state::ServerState;

fn sim(sid: &str, serial: &str, status: SimStatus) -> SimRecord {
    SimRecord {
        sid: sid.to_string(),
        iccid: format!("8988307{}", sid),
        unique_name: Some(serial.to_string()),
        status,
    }
}

fn build(sims: Vec<SimRecord>) -> (Arc<MemoryRegistry>, Arc<ServerState>) {
    let registry = Arc::new(MemoryRegistry::new(sims));
    let directory = Arc::new(SimDirectory::new(
        Arc::clone(&registry) as Arc<dyn SimRegistry>,
        Duration::from_secs(300),
    ));
    let reconciler = Arc::new(SimReconciler::new(
        Arc::clone(&registry) as Arc<dyn SimRegistry>,
        Arc::clone(&directory),
    ));
    let state = Arc::new(ServerState::new(
        Arc::clone(&registry) as Arc<dyn SimRegistry>,
        directory,
        reconciler,
    ));
    (registry, state)
}

async fn put_status(state: &Arc<ServerState>, serial: &str, status: &str) -> StatusCode {
    let response = put_sim_handler(
        State(Arc::clone(state)),
        Path(serial.to_string()),
        Json(SimStatusRequest {
            status: status.to_string(),
        }),
    )
    .await;
    response.status()
}

#[tokio::test]
async fn test_second_identical_request_is_a_no_op() {
    let (registry, state) = build(vec![sim("001", "SER-A", SimStatus::Ready)]);

    let first = state
        .reconciler
        .reconcile("SER-A", SimStatus::Active)
        .await
        .unwrap();
    assert!(matches!(first, ReconcileOutcome::Updated(_)));
    assert_eq!(registry.calls().await.len(), 1);

    let second = state
        .reconciler
        .reconcile("SER-A", SimStatus::Active)
        .await
        .unwrap();
    assert!(matches!(second, ReconcileOutcome::NoChange(_)));
    assert_eq!(registry.calls().await.len(), 1);
}

#[tokio::test]
async fn test_deactivating_a_ready_sim_passes_through_active() {
    let (registry, state) = build(vec![sim("001", "SER-A", SimStatus::Ready)]);

    let outcome = state
        .reconciler
        .reconcile("SER-A", SimStatus::Inactive)
        .await
        .unwrap();
    match outcome {
        ReconcileOutcome::Updated(record) => assert_eq!(record.status, SimStatus::Inactive),
        other => panic!("expected Updated, got {:?}", other),
    }

    assert_eq!(
        registry.calls().await,
        vec![
            RegistryCall::UpdateStatus {
                sid: "001".to_string(),
                status: SimStatus::Active,
            },
            RegistryCall::UpdateStatus {
                sid: "001".to_string(),
                status: SimStatus::Inactive,
            },
        ]
    );

    // The directory was written through, so the final status is served
    // without another listing fetch
    let cached = state.directory.lookup("SER-A").await.unwrap().unwrap();
    assert_eq!(cached.status, SimStatus::Inactive);
    assert_eq!(registry.fetch_count().await, 1);
}

#[tokio::test]
async fn test_put_already_active_sim_returns_accepted() {
    let (registry, state) = build(vec![sim("001", "SER-A", SimStatus::Active)]);

    assert_eq!(put_status(&state, "SER-A", "active").await, StatusCode::ACCEPTED);
    assert!(registry.calls().await.is_empty());
}

#[tokio::test]
async fn test_put_status_change_returns_ok() {
    let (registry, state) = build(vec![sim("001", "SER-A", SimStatus::Ready)]);

    assert_eq!(put_status(&state, "SER-A", "Active").await, StatusCode::OK);
    assert_eq!(registry.calls().await.len(), 1);
    assert_eq!(
        registry.record("001").await.unwrap().status,
        SimStatus::Active
    );
}

#[tokio::test]
async fn test_put_unknown_serial_returns_not_found() {
    let (registry, state) = build(vec![sim("001", "SER-A", SimStatus::Active)]);

    assert_eq!(
        put_status(&state, "SER-MISSING", "active").await,
        StatusCode::NOT_FOUND
    );
    assert!(registry.calls().await.is_empty());
}

#[tokio::test]
async fn test_put_provider_rejection_returns_bad_gateway() {
    let (registry, state) = build(vec![sim("001", "SER-A", SimStatus::Active)]);
    registry.fail_on_status(Some(SimStatus::Inactive)).await;

    assert_eq!(
        put_status(&state, "SER-A", "inactive").await,
        StatusCode::BAD_GATEWAY
    );

    // Nothing landed in the cache for the failed write
    let cached = state.directory.lookup("SER-A").await.unwrap().unwrap();
    assert_eq!(cached.status, SimStatus::Active);
}

#[tokio::test]
async fn test_put_failed_second_leg_leaves_sim_active() {
    let (registry, state) = build(vec![sim("001", "SER-A", SimStatus::Ready)]);
    registry.fail_on_status(Some(SimStatus::Inactive)).await;

    assert_eq!(
        put_status(&state, "SER-A", "inactive").await,
        StatusCode::BAD_GATEWAY
    );

    // The first leg succeeded; provider and cache agree on active
    assert_eq!(
        registry.record("001").await.unwrap().status,
        SimStatus::Active
    );
    let cached = state.directory.lookup("SER-A").await.unwrap().unwrap();
    assert_eq!(cached.status, SimStatus::Active);
}
