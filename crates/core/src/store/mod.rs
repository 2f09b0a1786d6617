//! Durable record of the provisioning outcome.
//!
//! The store holds a single slot: each successful run overwrites the
//! previous result. Writes happen once per run, after every stage succeeded.

mod error;
mod sqlite;
mod traits;
mod types;

pub use error::ResultStoreError;
pub use sqlite::SqliteResultStore;
pub use traits::ResultStore;
pub use types::{PersistedResult, ProvisioningResult};
