//! Step-stream consumer.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use chrono::Utc;
use futures::StreamExt;
use tracing::{debug, info, warn};

use super::config::DaoSettings;
use super::error::{DaoCreationError, IncompleteReason};
use super::traits::{DaoClient, DaoStepStream};
use super::types::{CreatedDao, DaoCreationParams, DaoCreationStep, DaoMetadata, TokenVotingInstall};
use crate::audit::{AuditEvent, AuditHandle};
use crate::metrics;

/// Drains a step stream until its terminal step.
///
/// `on_step` sees every successfully received step, in order. The first
/// failed step aborts consumption. Each wait for the next step is bounded by
/// `step_timeout`. After `Done` the stream must end; a further step is
/// rejected.
pub async fn consume_steps<F>(
    mut stream: DaoStepStream,
    step_timeout: Duration,
    mut on_step: F,
) -> Result<CreatedDao, DaoCreationError>
where
    F: FnMut(&DaoCreationStep),
{
    let mut steps_observed = 0usize;
    let mut last_tx = None;

    let created = loop {
        let next = tokio::time::timeout(step_timeout, stream.next())
            .await
            .map_err(|_| DaoCreationError::ConfirmationTimeout {
                timeout_secs: step_timeout.as_secs(),
                last_tx,
            })?;

        let step = match next {
            None => {
                return Err(DaoCreationError::incomplete(
                    steps_observed,
                    IncompleteReason::Exhausted,
                ))
            }
            Some(Err(e)) => {
                return Err(DaoCreationError::incomplete(
                    steps_observed,
                    IncompleteReason::StepFailed(e),
                ))
            }
            Some(Ok(step)) => step,
        };

        steps_observed += 1;
        on_step(&step);

        match step {
            DaoCreationStep::Creating { tx_hash } => {
                debug!(%tx_hash, step = steps_observed, "DAO creation transaction pending");
                last_tx = Some(tx_hash);
            }
            DaoCreationStep::Done {
                dao_address,
                plugin_addresses,
            } => {
                let Some(&voting_plugin_address) = plugin_addresses.first() else {
                    return Err(DaoCreationError::incomplete(
                        steps_observed,
                        IncompleteReason::MissingPlugin,
                    ));
                };
                if dao_address == Address::ZERO || voting_plugin_address == Address::ZERO {
                    return Err(DaoCreationError::incomplete(
                        steps_observed,
                        IncompleteReason::ZeroAddress,
                    ));
                }
                if plugin_addresses.len() > 1 {
                    debug!(
                        extra = plugin_addresses.len() - 1,
                        "Ignoring plugins beyond the voting plugin"
                    );
                }
                break CreatedDao {
                    dao_address,
                    voting_plugin_address,
                };
            }
        }
    };

    match tokio::time::timeout(step_timeout, stream.next()).await {
        Ok(None) => {}
        Ok(Some(_)) => {
            return Err(DaoCreationError::incomplete(
                steps_observed + 1,
                IncompleteReason::StepAfterDone,
            ))
        }
        Err(_) => warn!("Step stream still open after the terminal step, not waiting further"),
    }

    Ok(created)
}

/// Creates DAOs with an installed token-voting plugin.
pub struct DaoCreator {
    client: Arc<dyn DaoClient>,
    settings: DaoSettings,
    step_timeout: Duration,
    audit: Option<(AuditHandle, String)>,
}

impl DaoCreator {
    pub fn new(client: Arc<dyn DaoClient>, settings: DaoSettings, step_timeout: Duration) -> Self {
        Self {
            client,
            settings,
            step_timeout,
            audit: None,
        }
    }

    /// Records observed steps as audit events for the given run.
    pub fn with_audit(mut self, audit: AuditHandle, run_id: impl Into<String>) -> Self {
        self.audit = Some((audit, run_id.into()));
        self
    }

    /// Pins the DAO metadata and returns its URI.
    pub async fn pin_metadata(&self, metadata: &DaoMetadata) -> Result<String, DaoCreationError> {
        let uri = self
            .client
            .pin_metadata(metadata)
            .await
            .map_err(DaoCreationError::MetadataPinningFailed)?;
        info!(%uri, name = %metadata.name, "Pinned DAO metadata");
        Ok(uri)
    }

    /// Creates a DAO whose voting plugin draws power from `token_address`.
    ///
    /// Not restartable: every call submits a new creation.
    pub async fn create_dao_with_plugin(
        &self,
        token_address: Address,
        metadata_uri: &str,
    ) -> Result<CreatedDao, DaoCreationError> {
        let params = DaoCreationParams {
            metadata_uri: metadata_uri.to_string(),
            ens_subdomain: self.settings.ens_subdomain(Utc::now()),
            token_voting: TokenVotingInstall {
                token_address,
                voting_settings: self.settings.voting.plugin_settings(),
            },
        };

        info!(
            client = self.client.name(),
            token = %token_address,
            subdomain = %params.ens_subdomain,
            voting_mode = ?params.token_voting.voting_settings.voting_mode,
            "Creating DAO with token-voting plugin"
        );

        let stream = self.client.create_dao(params);
        let created = consume_steps(stream, self.step_timeout, |step| {
            metrics::DAO_STEPS_OBSERVED
                .with_label_values(&[step.tag()])
                .inc();

            if let Some((audit, run_id)) = &self.audit {
                let tx_hash = match step {
                    DaoCreationStep::Creating { tx_hash } => Some(tx_hash.to_string()),
                    DaoCreationStep::Done { .. } => None,
                };
                audit.try_emit(AuditEvent::DaoStepObserved {
                    run_id: run_id.clone(),
                    step: step.tag().to_string(),
                    tx_hash,
                });
            }
        })
        .await?;

        info!(
            dao = %created.dao_address,
            plugin = %created.voting_plugin_address,
            "DAO created"
        );
        Ok(created)
    }
}
