//! Trait definitions for the result store.

use super::error::ResultStoreError;
use super::types::{PersistedResult, ProvisioningResult};

/// Single-slot store of the latest provisioning result.
///
/// Implementations serialize concurrent writers; the last write wins.
pub trait ResultStore: Send + Sync {
    /// Overwrites the slot with `result`. Incomplete results are rejected.
    fn save(&self, run_id: &str, result: &ProvisioningResult) -> Result<(), ResultStoreError>;

    /// Returns the last saved result, if any.
    fn load(&self) -> Result<Option<PersistedResult>, ResultStoreError>;
}
