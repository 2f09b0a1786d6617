use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit event types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    // System events
    ServiceStarted {
        version: String,
        config_hash: String,
    },
    ServiceStopped {
        reason: String,
    },

    // Provisioning runs
    RunStarted {
        run_id: String,
        /// Fingerprint of the admin key, never the key itself
        key_fingerprint: String,
        rpc_url: String,
    },
    StageCompleted {
        run_id: String,
        /// Stage the run just entered (e.g. "token_deployed")
        stage: String,
        duration_ms: u64,
        /// Address or hash produced by the stage
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    DaoStepObserved {
        run_id: String,
        /// Step tag: "creating" or "done"
        step: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tx_hash: Option<String>,
    },
    RunSucceeded {
        run_id: String,
        dao_address: String,
        token_voting_plugin_address: String,
        erc20_token_address: String,
        duration_ms: u64,
    },
    RunFailed {
        run_id: String,
        /// Last stage reached before the failure
        stage: String,
        error_kind: String,
        error: String,
        /// Token deployed but not handed over, needs manual recovery
        #[serde(default, skip_serializing_if = "Option::is_none")]
        orphaned_token: Option<String>,
    },
}

impl AuditEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ServiceStarted { .. } => "service_started",
            Self::ServiceStopped { .. } => "service_stopped",
            Self::RunStarted { .. } => "run_started",
            Self::StageCompleted { .. } => "stage_completed",
            Self::DaoStepObserved { .. } => "dao_step_observed",
            Self::RunSucceeded { .. } => "run_succeeded",
            Self::RunFailed { .. } => "run_failed",
        }
    }

    pub fn run_id(&self) -> Option<&str> {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::StageCompleted { run_id, .. }
            | Self::DaoStepObserved { run_id, .. }
            | Self::RunSucceeded { run_id, .. }
            | Self::RunFailed { run_id, .. } => Some(run_id),
            Self::ServiceStarted { .. } | Self::ServiceStopped { .. } => None,
        }
    }
}

/// A persisted audit event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub run_id: Option<String>,
    pub data: AuditEvent,
}
