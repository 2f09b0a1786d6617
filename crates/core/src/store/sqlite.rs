//! SQLite-backed result store.

use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::error::ResultStoreError;
use super::traits::ResultStore;
use super::types::{PersistedResult, ProvisioningResult};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS provisioning_result (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        run_id TEXT NOT NULL,
        dao_address TEXT NOT NULL,
        token_voting_plugin_address TEXT NOT NULL,
        erc20_token_address TEXT NOT NULL,
        saved_at TEXT NOT NULL
    );
"#;

/// Result store keeping its single row in SQLite.
pub struct SqliteResultStore {
    conn: Mutex<Connection>,
}

impl SqliteResultStore {
    pub fn new(path: &Path) -> Result<Self, ResultStoreError> {
        Self::with_connection(Connection::open(path)?)
    }

    /// In-memory store, for tests.
    pub fn in_memory() -> Result<Self, ResultStoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, ResultStoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, ResultStoreError> {
        self.conn.lock().map_err(|_| ResultStoreError::LockPoisoned)
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address, ResultStoreError> {
    Address::from_str(value)
        .map_err(|e| ResultStoreError::Corrupt(format!("{}: {}", field, e)))
}

impl ResultStore for SqliteResultStore {
    fn save(&self, run_id: &str, result: &ProvisioningResult) -> Result<(), ResultStoreError> {
        result.ensure_complete()?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO provisioning_result
                (id, run_id, dao_address, token_voting_plugin_address, erc20_token_address, saved_at)
            VALUES (1, ?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                run_id = excluded.run_id,
                dao_address = excluded.dao_address,
                token_voting_plugin_address = excluded.token_voting_plugin_address,
                erc20_token_address = excluded.erc20_token_address,
                saved_at = excluded.saved_at
            "#,
            params![
                run_id,
                result.dao_address.to_string(),
                result.token_voting_plugin_address.to_string(),
                result.erc20_token_address.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedResult>, ResultStoreError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                r#"
                SELECT run_id, dao_address, token_voting_plugin_address, erc20_token_address, saved_at
                FROM provisioning_result WHERE id = 1
                "#,
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((run_id, dao, plugin, token, saved_at)) = row else {
            return Ok(None);
        };

        let saved_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&saved_at)
            .map_err(|e| ResultStoreError::Corrupt(format!("saved_at: {}", e)))?
            .into();

        Ok(Some(PersistedResult {
            result: ProvisioningResult {
                dao_address: parse_address("dao_address", &dao)?,
                token_voting_plugin_address: parse_address("token_voting_plugin_address", &plugin)?,
                erc20_token_address: parse_address("erc20_token_address", &token)?,
            },
            run_id,
            saved_at,
        }))
    }
}
