//! In-memory result store for testing.

use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::store::{PersistedResult, ProvisioningResult, ResultStore, ResultStoreError};

#[derive(Debug, Default)]
struct InMemoryState {
    slot: Option<PersistedResult>,
    save_count: usize,
    fail_writes: bool,
}

/// [`ResultStore`] held in memory, counting writes.
///
/// The trait is synchronous, so state sits behind a std mutex.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResultStore {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    /// Number of successful writes.
    pub fn save_count(&self) -> usize {
        self.state.lock().unwrap().save_count
    }

    /// The stored result, if any.
    pub fn result(&self) -> Option<ProvisioningResult> {
        self.state.lock().unwrap().slot.as_ref().map(|p| p.result)
    }
}

impl ResultStore for InMemoryResultStore {
    fn save(&self, run_id: &str, result: &ProvisioningResult) -> Result<(), ResultStoreError> {
        result.ensure_complete()?;

        let mut state = self.state.lock().map_err(|_| ResultStoreError::LockPoisoned)?;
        if state.fail_writes {
            return Err(ResultStoreError::Corrupt("write failure injected".to_string()));
        }
        state.slot = Some(PersistedResult {
            result: *result,
            run_id: run_id.to_string(),
            saved_at: Utc::now(),
        });
        state.save_count += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedResult>, ResultStoreError> {
        let state = self.state.lock().map_err(|_| ResultStoreError::LockPoisoned)?;
        Ok(state.slot.clone())
    }
}
