//! In-memory SIM registry used by tests and local development

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::SwitchError;
use crate::models::sim::{SimRecord, SimStatus};
use crate::provider::SimRegistry;

/// A mutating call recorded by the in-memory registry
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryCall {
    UpdateStatus { sid: String, status: SimStatus },
    UpdateLabel { sid: String, unique_name: String },
}

#[derive(Default)]
struct Inner {
    sims: Vec<SimRecord>,
    calls: Vec<RegistryCall>,
    fetch_count: usize,
    fail_listing: bool,
    fail_on_status: Option<SimStatus>,
}

/// SIM registry holding its inventory in memory
///
/// Mutations are recorded so callers can assert on the exact sequence of
/// provider writes. Failures can be injected for the whole listing or for
/// status updates targeting one specific status.
#[derive(Default)]
pub struct MemoryRegistry {
    inner: Mutex<Inner>,
}

impl MemoryRegistry {
    pub fn new(sims: Vec<SimRecord>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                sims,
                ..Inner::default()
            }),
        }
    }

    /// Make every `fetch_all` call fail until cleared
    pub async fn fail_listing(&self, fail: bool) {
        self.inner.lock().await.fail_listing = fail;
    }

    /// Make `update_status` fail whenever it targets `status`
    pub async fn fail_on_status(&self, status: Option<SimStatus>) {
        self.inner.lock().await.fail_on_status = status;
    }

    /// Number of times the full listing has been fetched
    pub async fn fetch_count(&self) -> usize {
        self.inner.lock().await.fetch_count
    }

    /// Every mutating call in the order it arrived
    pub async fn calls(&self) -> Vec<RegistryCall> {
        self.inner.lock().await.calls.clone()
    }

    /// Current record for `sid`, if any
    pub async fn record(&self, sid: &str) -> Option<SimRecord> {
        self.inner
            .lock()
            .await
            .sims
            .iter()
            .find(|sim| sim.sid == sid)
            .cloned()
    }
}

#[async_trait]
impl SimRegistry for MemoryRegistry {
    async fn fetch_all(&self) -> Result<Vec<SimRecord>, SwitchError> {
        let mut inner = self.inner.lock().await;
        if inner.fail_listing {
            return Err(SwitchError::ProviderError(
                "503: listing unavailable".to_string(),
            ));
        }
        inner.fetch_count += 1;
        Ok(inner.sims.clone())
    }

    async fn update_status(&self, sid: &str, status: SimStatus) -> Result<SimRecord, SwitchError> {
        let mut inner = self.inner.lock().await;

        if inner.fail_on_status.as_ref() == Some(&status) {
            return Err(SwitchError::ProviderError(format!(
                "500: cannot move {} to {}",
                sid, status
            )));
        }

        inner.calls.push(RegistryCall::UpdateStatus {
            sid: sid.to_string(),
            status: status.clone(),
        });

        let sim = inner
            .sims
            .iter_mut()
            .find(|sim| sim.sid == sid)
            .ok_or_else(|| SwitchError::ProviderError(format!("404: SIM {} not found", sid)))?;
        sim.status = status;
        Ok(sim.clone())
    }

    async fn update_label(&self, sid: &str, unique_name: &str) -> Result<SimRecord, SwitchError> {
        let mut inner = self.inner.lock().await;

        inner.calls.push(RegistryCall::UpdateLabel {
            sid: sid.to_string(),
            unique_name: unique_name.to_string(),
        });

        let sim = inner
            .sims
            .iter_mut()
            .find(|sim| sim.sid == sid)
            .ok_or_else(|| SwitchError::ProviderError(format!("404: SIM {} not found", sid)))?;
        sim.unique_name = Some(unique_name.to_string());
        Ok(sim.clone())
    }
}
