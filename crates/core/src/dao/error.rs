//! Error types for the DAO module.

use alloy_primitives::TxHash;
use thiserror::Error;

/// Errors reported by a DAO client.
#[derive(Debug, Clone, Error)]
pub enum DaoClientError {
    /// Transport-level failure talking to the node or SDK backend.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The metadata document could not be pinned.
    #[error("Metadata pinning failed: {0}")]
    Pinning(String),

    /// The creation transaction reverted.
    #[error("DAO creation transaction {tx_hash} reverted")]
    Reverted { tx_hash: TxHash },
}

/// Why a step stream did not produce a usable terminal step.
#[derive(Debug, Clone, Error)]
pub enum IncompleteReason {
    /// A step failed; the stream was abandoned at that point.
    #[error("step failed: {0}")]
    StepFailed(#[source] DaoClientError),

    /// The stream ended before a `Done` step.
    #[error("stream ended before the terminal step")]
    Exhausted,

    /// The `Done` step listed no plugin.
    #[error("terminal step carries no plugin address")]
    MissingPlugin,

    /// The `Done` step carried a zero address.
    #[error("terminal step carries a zero address")]
    ZeroAddress,

    /// A step arrived after `Done`.
    #[error("step received after the terminal step")]
    StepAfterDone,
}

/// Errors that can occur while creating the DAO.
#[derive(Debug, Error)]
pub enum DaoCreationError {
    /// The metadata document could not be pinned.
    #[error("Metadata pinning failed: {0}")]
    MetadataPinningFailed(#[source] DaoClientError),

    /// The step stream did not reach a valid terminal step.
    #[error("DAO creation incomplete after {steps_observed} step(s): {reason}")]
    PipelineIncomplete {
        steps_observed: usize,
        #[source]
        reason: IncompleteReason,
    },

    /// Waiting for the next step exceeded the confirmation bound.
    #[error("DAO creation step timed out after {timeout_secs}s")]
    ConfirmationTimeout {
        timeout_secs: u64,
        /// Last pending creation transaction seen, if any.
        last_tx: Option<TxHash>,
    },
}

impl DaoCreationError {
    pub(crate) fn incomplete(steps_observed: usize, reason: IncompleteReason) -> Self {
        Self::PipelineIncomplete {
            steps_observed,
            reason,
        }
    }
}
