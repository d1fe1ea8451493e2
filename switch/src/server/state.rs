//! Server state

use std::sync::Arc;

use crate::cache::directory::SimDirectory;
use crate::provider::SimRegistry;
use crate::reconcile::reconciler::SimReconciler;

/// Server state shared across handlers
pub struct ServerState {
    pub registry: Arc<dyn SimRegistry>,
    pub directory: Arc<SimDirectory>,
    pub reconciler: Arc<SimReconciler>,
}

impl ServerState {
    pub fn new(
        registry: Arc<dyn SimRegistry>,
        directory: Arc<SimDirectory>,
        reconciler: Arc<SimReconciler>,
    ) -> Self {
        Self {
            registry,
            directory,
            reconciler,
        }
    }
}
