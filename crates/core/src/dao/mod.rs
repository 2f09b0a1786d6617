//! DAO creation through a step stream.
//!
//! A DAO client creates the DAO shell and installs the token-voting plugin in
//! a single on-chain submission. Progress comes back as a lazy, single-pass
//! stream of [`DaoCreationStep`]s: zero or more `Creating` steps carrying the
//! pending transaction, then exactly one `Done` step with the final
//! addresses.
//!
//! [`DaoCreator`] drains that stream. Any per-step error aborts the whole
//! creation, and a stream that ends without `Done` is reported as
//! [`DaoCreationError::PipelineIncomplete`] instead of a partially populated
//! result. The stream cannot be resumed: calling again creates a new DAO.

mod config;
mod consumer;
mod error;
mod traits;
mod types;

pub use config::{
    DaoConfig, DaoSettings, VotingMode, VotingSettings, MAX_VOTING_DURATION_SECS,
    MIN_VOTING_DURATION_SECS,
};
pub use consumer::{consume_steps, DaoCreator};
pub use error::{DaoClientError, DaoCreationError, IncompleteReason};
pub use traits::{DaoClient, DaoStepStream};
pub use types::{
    CreatedDao, DaoCreationParams, DaoCreationStep, DaoMetadata, DaoMetadataLink,
    PluginVotingSettings, TokenVotingInstall,
};
