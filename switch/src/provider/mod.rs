//! SIM provider registry module

pub mod http;
pub mod memory;

use async_trait::async_trait;

use crate::errors::SwitchError;
use crate::models::sim::{SimRecord, SimStatus};

/// Interface to the cellular provider's SIM inventory
#[async_trait]
pub trait SimRegistry: Send + Sync {
    /// Fetch every SIM on the account
    async fn fetch_all(&self) -> Result<Vec<SimRecord>, SwitchError>;

    /// Change a SIM's lifecycle status and return the updated record
    async fn update_status(&self, sid: &str, status: SimStatus) -> Result<SimRecord, SwitchError>;

    /// Change a SIM's display label and return the updated record
    async fn update_label(&self, sid: &str, unique_name: &str) -> Result<SimRecord, SwitchError>;
}
