//! TTL cache over the provider's SIM directory
//!
//! The directory holds one full listing keyed by SIM display name. A lookup
//! that misses a fresh listing refreshes the whole thing in one provider
//! call; a name absent from a fresh listing is a plain miss and does not
//! trigger another fetch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::info;

use crate::errors::SwitchError;
use crate::models::sim::SimRecord;
use crate::provider::SimRegistry;

/// One full listing of the provider directory, keyed by display name
struct Snapshot {
    entries: HashMap<String, SimRecord>,
    stored_at: Instant,
}

impl Snapshot {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() <= ttl
    }
}

/// Cached view of the provider's SIM inventory
pub struct SimDirectory {
    registry: Arc<dyn SimRegistry>,
    ttl: Duration,
    snapshot: RwLock<Option<Snapshot>>,

    /// Serializes refreshes so concurrent misses collapse into one fetch
    refresh_gate: Mutex<()>,
}

impl SimDirectory {
    pub fn new(registry: Arc<dyn SimRegistry>, ttl: Duration) -> Self {
        Self {
            registry,
            ttl,
            snapshot: RwLock::new(None),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Find a SIM by display name
    ///
    /// `Ok(None)` means the provider has no SIM under that name. An `Err`
    /// means the listing could not be refreshed; whatever was cached before
    /// stays in place for the next attempt.
    pub async fn lookup(&self, name: &str) -> Result<Option<SimRecord>, SwitchError> {
        if let Some(found) = self.lookup_fresh(name).await {
            return Ok(found);
        }

        let _flight = self.refresh_gate.lock().await;

        // Another task may have refreshed while this one waited on the gate
        if let Some(found) = self.lookup_fresh(name).await {
            return Ok(found);
        }

        let records = self.registry.fetch_all().await?;

        let mut entries = HashMap::new();
        for record in records {
            // SIMs without a display name are never cached
            match record.unique_name.as_deref() {
                Some(label) if !label.is_empty() => {
                    entries.insert(label.to_string(), record);
                }
                _ => {}
            }
        }
        info!("SIM directory refreshed: {} named SIMs", entries.len());

        let found = entries.get(name).cloned();
        *self.snapshot.write().await = Some(Snapshot {
            entries,
            stored_at: Instant::now(),
        });

        Ok(found)
    }

    /// Overwrite one entry in the current listing after a provider write
    ///
    /// Does not touch the listing's age and does nothing for unnamed
    /// records or when no listing has been fetched yet.
    pub async fn insert(&self, record: &SimRecord) {
        let Some(label) = record.unique_name.as_deref().filter(|l| !l.is_empty()) else {
            return;
        };

        let mut snapshot = self.snapshot.write().await;
        if let Some(snap) = snapshot.as_mut() {
            snap.entries.insert(label.to_string(), record.clone());
        }
    }

    /// Number of SIMs in the current listing, fresh or not
    pub async fn len(&self) -> usize {
        self.snapshot
            .read()
            .await
            .as_ref()
            .map_or(0, |snap| snap.entries.len())
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn lookup_fresh(&self, name: &str) -> Option<Option<SimRecord>> {
        let snapshot = self.snapshot.read().await;
        match snapshot.as_ref() {
            Some(snap) if snap.is_fresh(self.ttl) => Some(snap.entries.get(name).cloned()),
            _ => None,
        }
    }
}
