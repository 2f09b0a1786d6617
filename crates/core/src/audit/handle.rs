use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::AuditEvent;

/// An audit event stamped with the time it was emitted
#[derive(Debug, Clone)]
pub struct AuditEventEnvelope {
    pub timestamp: DateTime<Utc>,
    pub event: AuditEvent,
}

impl AuditEventEnvelope {
    fn now(event: AuditEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Cloneable sender side of the audit channel.
///
/// Emitting never fails the caller: a closed or full channel is logged and
/// the event is dropped.
#[derive(Clone)]
pub struct AuditHandle {
    tx: mpsc::Sender<AuditEventEnvelope>,
}

impl AuditHandle {
    pub fn new(tx: mpsc::Sender<AuditEventEnvelope>) -> Self {
        Self { tx }
    }

    /// Emit an event, waiting for channel capacity
    pub async fn emit(&self, event: AuditEvent) {
        if let Err(e) = self.tx.send(AuditEventEnvelope::now(event)).await {
            tracing::error!("Failed to emit audit event: {}", e);
        }
    }

    /// Emit an event without waiting; returns false if it was dropped
    pub fn try_emit(&self, event: AuditEvent) -> bool {
        match self.tx.try_send(AuditEventEnvelope::now(event)) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Dropped audit event: {}", e);
                false
            }
        }
    }
}
