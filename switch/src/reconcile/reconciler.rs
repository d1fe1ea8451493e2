//! Drives a SIM from its current provider status to a requested one

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::directory::SimDirectory;
use crate::errors::SwitchError;
use crate::models::sim::{SimRecord, SimStatus};
use crate::provider::SimRegistry;

/// Result of a reconcile request
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// Provider state was changed; carries the final record
    Updated(SimRecord),

    /// SIM already had the requested status, nothing was written
    NoChange(SimRecord),

    /// No SIM is labeled with the requested serial
    NotFound,
}

/// Reconciles requested SIM statuses against the provider
pub struct SimReconciler {
    registry: Arc<dyn SimRegistry>,
    directory: Arc<SimDirectory>,
}

impl SimReconciler {
    pub fn new(registry: Arc<dyn SimRegistry>, directory: Arc<SimDirectory>) -> Self {
        Self {
            registry,
            directory,
        }
    }

    /// Bring the SIM labeled `serial` to `desired`
    ///
    /// Every successful provider write lands in the directory immediately,
    /// so a failure partway through a multi-step transition leaves the cache
    /// agreeing with the provider. Provider failures come back as errors and
    /// are never retried here.
    pub async fn reconcile(
        &self,
        serial: &str,
        desired: SimStatus,
    ) -> Result<ReconcileOutcome, SwitchError> {
        let Some(sim) = self.directory.lookup(serial).await? else {
            info!("No SIM labeled '{}'", serial);
            return Ok(ReconcileOutcome::NotFound);
        };

        if sim.status == desired {
            debug!("SIM {} already {}", sim.sid, desired);
            return Ok(ReconcileOutcome::NoChange(sim));
        }

        // A ready SIM cannot be deactivated directly; it has to pass
        // through active first
        if sim.status == SimStatus::Ready && desired == SimStatus::Inactive {
            info!("SIM {} is ready, activating before deactivation", sim.sid);
            let activated = self
                .registry
                .update_status(&sim.sid, SimStatus::Active)
                .await?;
            self.directory.insert(&activated).await;
        }

        let updated = self.registry.update_status(&sim.sid, desired).await?;
        self.directory.insert(&updated).await;

        info!(
            "SIM {} moved {} -> {}",
            updated.sid, sim.status, updated.status
        );
        Ok(ReconcileOutcome::Updated(updated))
    }
}
