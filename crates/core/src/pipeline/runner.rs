//! Provisioning pipeline implementation.

use std::sync::Arc;
use std::time::Instant;

use alloy_primitives::Address;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::account::{AccountProvisioner, BundlerConnector};
use crate::audit::{AuditEvent, AuditHandle};
use crate::chain::{ChainConnector, SigningKey};
use crate::config::redact_url;
use crate::dao::{DaoClient, DaoCreator};
use crate::metrics;
use crate::store::{ProvisioningResult, ResultStore};
use crate::token::{ContractArtifact, TokenDeployer};

use super::config::ProvisionerSettings;
use super::types::{ProvisioningError, ProvisioningRequest, ProvisioningStage};

/// Tracks stage transitions of one run for logs, metrics and audit.
struct RunTracker<'a> {
    run_id: &'a str,
    audit: Option<&'a AuditHandle>,
    stage: ProvisioningStage,
    stage_started: Instant,
}

impl<'a> RunTracker<'a> {
    fn new(run_id: &'a str, audit: Option<&'a AuditHandle>) -> Self {
        Self {
            run_id,
            audit,
            stage: ProvisioningStage::Start,
            stage_started: Instant::now(),
        }
    }

    fn advance(&mut self, stage: ProvisioningStage, detail: Option<String>) {
        let elapsed = self.stage_started.elapsed();
        metrics::STAGE_DURATION
            .with_label_values(&[stage.as_str()])
            .observe(elapsed.as_secs_f64());
        info!(
            run_id = %self.run_id,
            from = %self.stage,
            to = %stage,
            detail = detail.as_deref().unwrap_or(""),
            elapsed_ms = elapsed.as_millis() as u64,
            "Provisioning stage completed"
        );
        if let Some(audit) = self.audit {
            audit.try_emit(AuditEvent::StageCompleted {
                run_id: self.run_id.to_string(),
                stage: stage.as_str().to_string(),
                duration_ms: elapsed.as_millis() as u64,
                detail,
            });
        }

        self.stage = stage;
        self.stage_started = Instant::now();
    }

    /// Moves the run to `Failed` and returns the last completed stage.
    fn fail(&mut self) -> ProvisioningStage {
        let last = self.stage;
        self.stage = ProvisioningStage::Failed;
        last
    }
}

/// Runs provisioning requests against a fixed set of collaborators.
///
/// Runs are independent of each other and may execute concurrently; the
/// result store serializes their writes.
pub struct DaoProvisioner {
    settings: ProvisionerSettings,
    accounts: AccountProvisioner,
    chain: Arc<dyn ChainConnector>,
    token: TokenDeployer,
    store: Arc<dyn ResultStore>,
    audit: Option<AuditHandle>,
}

impl DaoProvisioner {
    pub fn new(
        settings: ProvisionerSettings,
        bundler: Arc<dyn BundlerConnector>,
        chain: Arc<dyn ChainConnector>,
        artifact: Arc<ContractArtifact>,
        store: Arc<dyn ResultStore>,
    ) -> Self {
        let token = TokenDeployer::new(artifact, settings.confirmation_timeout);
        Self {
            settings,
            accounts: AccountProvisioner::new(bundler),
            chain,
            token,
            store,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: AuditHandle) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Provisions a DAO and returns its address.
    pub async fn create_dao(
        &self,
        dao_client: Arc<dyn DaoClient>,
        admin_signing_key: SigningKey,
        rpc_url: &str,
    ) -> Result<Address, ProvisioningError> {
        let request = ProvisioningRequest {
            admin_signing_key,
            rpc_endpoint: rpc_url.to_string(),
        };
        let result = self.run(dao_client, request).await?;
        Ok(result.dao_address)
    }

    /// Runs every stage in order and persists the result once all succeeded.
    ///
    /// On failure the partial result is discarded and the error, naming the
    /// last completed stage, is logged, audited and returned.
    pub async fn run(
        &self,
        dao_client: Arc<dyn DaoClient>,
        request: ProvisioningRequest,
    ) -> Result<ProvisioningResult, ProvisioningError> {
        let run_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        let rpc_url = redact_url(&request.rpc_endpoint);

        info!(
            %run_id,
            key = %request.admin_signing_key,
            %rpc_url,
            chain_id = self.settings.chain_id,
            "Starting provisioning run"
        );
        if let Some(audit) = &self.audit {
            audit
                .emit(AuditEvent::RunStarted {
                    run_id: run_id.clone(),
                    key_fingerprint: request.admin_signing_key.fingerprint(),
                    rpc_url,
                })
                .await;
        }

        let mut tracker = RunTracker::new(&run_id, self.audit.as_ref());
        match self.execute(&mut tracker, dao_client, &request).await {
            Ok(result) => {
                tracker.advance(ProvisioningStage::Done, None);
                let duration_ms = started.elapsed().as_millis() as u64;

                metrics::PROVISIONING_RUNS
                    .with_label_values(&["success"])
                    .inc();
                info!(
                    %run_id,
                    dao = %result.dao_address,
                    plugin = %result.token_voting_plugin_address,
                    token = %result.erc20_token_address,
                    duration_ms,
                    "Provisioning run succeeded"
                );
                if let Some(audit) = &self.audit {
                    audit
                        .emit(AuditEvent::RunSucceeded {
                            run_id: run_id.clone(),
                            dao_address: result.dao_address.to_string(),
                            token_voting_plugin_address: result
                                .token_voting_plugin_address
                                .to_string(),
                            erc20_token_address: result.erc20_token_address.to_string(),
                            duration_ms,
                        })
                        .await;
                }
                Ok(result)
            }
            Err(e) => {
                let last_stage = tracker.fail();
                self.record_failure(&run_id, last_stage, &e).await;
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        tracker: &mut RunTracker<'_>,
        dao_client: Arc<dyn DaoClient>,
        request: &ProvisioningRequest,
    ) -> Result<ProvisioningResult, ProvisioningError> {
        let key = &request.admin_signing_key;
        if key.is_empty() {
            return Err(ProvisioningError::InvalidRequest(
                "admin signing key is empty".to_string(),
            ));
        }
        if request.rpc_endpoint.trim().is_empty() {
            return Err(ProvisioningError::InvalidRequest(
                "rpc endpoint is empty".to_string(),
            ));
        }

        let account = self
            .accounts
            .provision_account(key, &self.settings.bundler_config())
            .await?;
        tracker.advance(
            ProvisioningStage::AccountProvisioned,
            Some(account.address.to_string()),
        );

        let chain = self
            .chain
            .connect(&request.rpc_endpoint, self.settings.chain_id)
            .await?;
        let (_, token_address) = self
            .token
            .deploy(chain.as_ref(), key, &self.settings.token)
            .await?;
        tracker.advance(
            ProvisioningStage::TokenDeployed,
            Some(token_address.to_string()),
        );

        let transfer_tx = self
            .token
            .transfer_ownership(chain.as_ref(), key, token_address, account.address)
            .await?;
        tracker.advance(
            ProvisioningStage::OwnershipTransferred,
            Some(transfer_tx.to_string()),
        );

        let mut creator = DaoCreator::new(
            dao_client,
            self.settings.dao.settings(),
            self.settings.confirmation_timeout,
        );
        if let Some(audit) = &self.audit {
            creator = creator.with_audit(audit.clone(), tracker.run_id);
        }
        let metadata_uri = creator.pin_metadata(&self.settings.dao.metadata()).await?;
        let dao = creator
            .create_dao_with_plugin(token_address, &metadata_uri)
            .await?;
        tracker.advance(
            ProvisioningStage::DaoCreated,
            Some(dao.dao_address.to_string()),
        );

        let result = ProvisioningResult {
            dao_address: dao.dao_address,
            token_voting_plugin_address: dao.voting_plugin_address,
            erc20_token_address: token_address,
        };
        self.store.save(tracker.run_id, &result)?;
        tracker.advance(ProvisioningStage::Persisted, None);

        Ok(result)
    }

    async fn record_failure(
        &self,
        run_id: &str,
        stage: ProvisioningStage,
        err: &ProvisioningError,
    ) {
        let kind = err.kind();

        metrics::PROVISIONING_RUNS.with_label_values(&["failed"]).inc();
        metrics::STAGE_FAILURES
            .with_label_values(&[stage.as_str(), kind])
            .inc();

        error!(%run_id, %stage, kind, "Provisioning run failed: {}", err);
        if let Some(token) = err.orphaned_token() {
            warn!(
                %run_id,
                %token,
                "Token is deployed but still owned by the admin key, recover it manually"
            );
        }

        if let Some(audit) = &self.audit {
            audit
                .emit(AuditEvent::RunFailed {
                    run_id: run_id.to_string(),
                    stage: stage.as_str().to_string(),
                    error_kind: kind.to_string(),
                    error: err.to_string(),
                    orphaned_token: err.orphaned_token().map(|a| a.to_string()),
                })
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::{DaoCreationStep, IncompleteReason};
    use crate::dao::DaoCreationError;
    use crate::testing::{
        fixtures, InMemoryResultStore, MockBundler, MockChain, MockDaoClient, RecordedTransaction,
        ScriptedStep,
    };
    use crate::token::TokenError;
    use alloy_primitives::TxHash;
    use std::time::Duration;

    struct Harness {
        bundler: MockBundler,
        chain: MockChain,
        dao_client: MockDaoClient,
        store: InMemoryResultStore,
        provisioner: DaoProvisioner,
    }

    fn harness() -> Harness {
        let bundler = MockBundler::new();
        let chain = MockChain::new();
        let store = InMemoryResultStore::new();
        let settings = ProvisionerSettings {
            bundler_url: "https://bundler.test".to_string(),
            ..ProvisionerSettings::default()
        }
        .with_confirmation_timeout(Duration::from_secs(2));

        let provisioner = DaoProvisioner::new(
            settings,
            Arc::new(bundler.clone()),
            Arc::new(chain.clone()),
            Arc::new(fixtures::token_artifact()),
            Arc::new(store.clone()),
        );

        Harness {
            bundler,
            chain,
            dao_client: MockDaoClient::new(),
            store,
            provisioner,
        }
    }

    impl Harness {
        async fn run(&self) -> Result<ProvisioningResult, ProvisioningError> {
            self.provisioner
                .run(
                    Arc::new(self.dao_client.clone()),
                    ProvisioningRequest::new("0xKEY", "https://rpc.test"),
                )
                .await
        }
    }

    #[tokio::test]
    async fn test_happy_path_persists_once() {
        let h = harness();

        let result = h.run().await.unwrap();

        assert_eq!(h.store.save_count(), 1);
        assert_eq!(h.store.result(), Some(result));
        assert!(result.ensure_complete().is_ok());

        // Token voting is bound to the deployed token, owned by the smart account.
        let account = MockBundler::derive_address(
            &fixtures::signing_key(),
            &ProvisionerSettings {
                bundler_url: "https://bundler.test".to_string(),
                ..ProvisionerSettings::default()
            }
            .bundler_config(),
        );
        assert_eq!(h.chain.owner_of(result.erc20_token_address).await, Some(account));
        let creations = h.dao_client.recorded_creations().await;
        assert_eq!(creations.len(), 1);
        assert_eq!(
            creations[0].token_voting.token_address,
            result.erc20_token_address
        );
        assert!(creations[0].metadata_uri.starts_with("ipfs://"));

        assert_eq!(
            h.chain.connections().await,
            vec![("https://rpc.test".to_string(), 31337)]
        );
    }

    #[tokio::test]
    async fn test_create_dao_returns_dao_address() {
        let h = harness();

        let dao = h
            .provisioner
            .create_dao(
                Arc::new(h.dao_client.clone()),
                SigningKey::new("0xKEY"),
                "https://rpc.test",
            )
            .await
            .unwrap();

        assert_eq!(h.store.result().unwrap().dao_address, dao);
    }

    #[tokio::test]
    async fn test_empty_key_is_rejected_before_any_call() {
        let h = harness();

        let err = h
            .provisioner
            .run(
                Arc::new(h.dao_client.clone()),
                ProvisioningRequest::new("  ", "https://rpc.test"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisioningError::InvalidRequest(_)));
        assert_eq!(h.bundler.connect_count().await, 0);
        assert_eq!(h.store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_bundler_unreachable() {
        let h = harness();
        h.bundler.set_unreachable(true).await;

        let err = h.run().await.unwrap_err();

        assert!(matches!(err, ProvisioningError::ProvisionerUnavailable(_)));
        assert_eq!(err.stage(), ProvisioningStage::Start);
        assert!(h.chain.recorded_transactions().await.is_empty());
        assert_eq!(h.store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_chain_unreachable() {
        let h = harness();
        h.chain.set_unreachable(true).await;

        let err = h.run().await.unwrap_err();

        assert!(matches!(err, ProvisioningError::ChainUnavailable(_)));
        assert_eq!(err.stage(), ProvisioningStage::AccountProvisioned);
        assert_eq!(h.store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_deployment_revert_stops_pipeline() {
        let h = harness();
        h.chain.set_revert_next_deploy(true).await;

        let err = h.run().await.unwrap_err();

        assert!(matches!(
            err,
            ProvisioningError::Token(TokenError::DeploymentReverted { .. })
        ));
        assert!(h.dao_client.recorded_creations().await.is_empty());
        assert_eq!(h.store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_transfer_revert_reports_orphaned_token() {
        let h = harness();
        h.chain.set_revert_next_call(true).await;

        let err = h.run().await.unwrap_err();

        assert_eq!(err.kind(), "transfer_reverted");
        assert_eq!(err.stage(), ProvisioningStage::TokenDeployed);
        let orphaned = err.orphaned_token().unwrap();
        let deployed = h
            .chain
            .recorded_transactions()
            .await
            .iter()
            .find_map(|tx| match tx {
                RecordedTransaction::Call { call, .. } => Some(call.to),
                _ => None,
            });
        assert_eq!(deployed, Some(orphaned));
        assert!(h.dao_client.recorded_creations().await.is_empty());
        assert_eq!(h.store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_pinning_failure() {
        let h = harness();
        h.dao_client.set_pinning_failure(true).await;

        let err = h.run().await.unwrap_err();

        assert!(matches!(
            err,
            ProvisioningError::Dao(DaoCreationError::MetadataPinningFailed(_))
        ));
        assert!(h.dao_client.recorded_creations().await.is_empty());
        assert_eq!(h.store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_step_failure_is_incomplete() {
        let h = harness();
        h.dao_client
            .set_script(vec![
                ScriptedStep::Step(DaoCreationStep::Creating {
                    tx_hash: TxHash::repeat_byte(1),
                }),
                ScriptedStep::Fail(crate::dao::DaoClientError::Reverted {
                    tx_hash: TxHash::repeat_byte(1),
                }),
            ])
            .await;

        let err = h.run().await.unwrap_err();

        assert!(matches!(
            err,
            ProvisioningError::Dao(DaoCreationError::PipelineIncomplete {
                steps_observed: 1,
                reason: IncompleteReason::StepFailed(_),
            })
        ));
        assert_eq!(h.store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure() {
        let h = harness();
        h.store.set_fail_writes(true);

        let err = h.run().await.unwrap_err();

        assert!(matches!(err, ProvisioningError::Store(_)));
        assert_eq!(err.stage(), ProvisioningStage::DaoCreated);
        assert!(h.store.result().is_none());
    }

    #[tokio::test]
    async fn test_run_emits_audit_trail() {
        let h = harness();
        let (tx, mut rx) = tokio::sync::mpsc::channel(64);
        let provisioner = h.provisioner.with_audit(AuditHandle::new(tx));

        provisioner
            .run(
                Arc::new(h.dao_client.clone()),
                ProvisioningRequest::new("0xKEY", "https://rpc.test"),
            )
            .await
            .unwrap();

        let mut types = Vec::new();
        let mut stages = Vec::new();
        while let Ok(envelope) = rx.try_recv() {
            if let AuditEvent::StageCompleted { stage, .. } = &envelope.event {
                stages.push(stage.clone());
            }
            types.push(envelope.event.event_type());
        }

        assert_eq!(types.first(), Some(&"run_started"));
        assert_eq!(types.last(), Some(&"run_succeeded"));
        assert_eq!(
            stages,
            vec![
                "account_provisioned",
                "token_deployed",
                "ownership_transferred",
                "dao_created",
                "persisted",
                "done",
            ]
        );
        assert!(!types.contains(&"run_failed"));
    }

    fn stage_durations(
        rx: &mut tokio::sync::mpsc::Receiver<crate::audit::AuditEventEnvelope>,
    ) -> Vec<(String, u64)> {
        let mut durations = Vec::new();
        while let Ok(envelope) = rx.try_recv() {
            if let AuditEvent::StageCompleted {
                stage, duration_ms, ..
            } = envelope.event
            {
                durations.push((stage, duration_ms));
            }
        }
        durations
    }

    #[tokio::test]
    async fn test_token_stages_are_timed_separately() {
        let h = harness();
        h.chain.set_receipt_delay(Duration::from_millis(60)).await;
        let (tx, mut rx) = tokio::sync::mpsc::channel(64);
        let provisioner = h.provisioner.with_audit(AuditHandle::new(tx));

        provisioner
            .run(
                Arc::new(h.dao_client.clone()),
                ProvisioningRequest::new("0xKEY", "https://rpc.test"),
            )
            .await
            .unwrap();

        let durations = stage_durations(&mut rx);
        let duration_of = |name: &str| {
            durations
                .iter()
                .find(|(stage, _)| stage == name)
                .map(|(_, ms)| *ms)
                .unwrap()
        };
        assert!(duration_of("token_deployed") >= 50);
        assert!(duration_of("ownership_transferred") >= 50);
    }

    #[tokio::test]
    async fn test_transfer_revert_still_audits_deployed_token() {
        let h = harness();
        h.chain.set_revert_next_call(true).await;
        let (tx, mut rx) = tokio::sync::mpsc::channel(64);
        let provisioner = h.provisioner.with_audit(AuditHandle::new(tx));

        provisioner
            .run(
                Arc::new(h.dao_client.clone()),
                ProvisioningRequest::new("0xKEY", "https://rpc.test"),
            )
            .await
            .unwrap_err();

        let stages: Vec<String> = stage_durations(&mut rx)
            .into_iter()
            .map(|(stage, _)| stage)
            .collect();
        assert_eq!(stages, vec!["account_provisioned", "token_deployed"]);
    }

    #[tokio::test]
    async fn test_run_started_redacts_rpc_query() {
        let h = harness();
        let (tx, mut rx) = tokio::sync::mpsc::channel(64);
        let provisioner = h.provisioner.with_audit(AuditHandle::new(tx));

        provisioner
            .run(
                Arc::new(h.dao_client.clone()),
                ProvisioningRequest::new("0xKEY", "https://rpc.test/v2?apikey=SECRET123"),
            )
            .await
            .unwrap();

        let mut started = None;
        while let Ok(envelope) = rx.try_recv() {
            if let AuditEvent::RunStarted { rpc_url, .. } = envelope.event {
                started = Some(rpc_url);
            }
        }
        assert_eq!(started.as_deref(), Some("https://rpc.test/v2?<redacted>"));
        // The chain itself still receives the full endpoint.
        assert_eq!(
            h.chain.connections().await[0].0,
            "https://rpc.test/v2?apikey=SECRET123"
        );
    }

    #[test]
    fn test_tracker_fail_reports_last_completed_stage() {
        let mut tracker = RunTracker::new("run-1", None);
        tracker.advance(ProvisioningStage::AccountProvisioned, None);

        assert_eq!(tracker.fail(), ProvisioningStage::AccountProvisioned);
        assert_eq!(tracker.stage, ProvisioningStage::Failed);
    }

    #[tokio::test]
    async fn test_empty_bundler_url_is_invalid_request() {
        let store = InMemoryResultStore::new();
        let provisioner = DaoProvisioner::new(
            ProvisionerSettings {
                bundler_url: " ".to_string(),
                ..ProvisionerSettings::default()
            },
            Arc::new(MockBundler::new()),
            Arc::new(MockChain::new()),
            Arc::new(fixtures::token_artifact()),
            Arc::new(store.clone()),
        );

        let err = provisioner
            .run(
                Arc::new(MockDaoClient::new()),
                ProvisioningRequest::new("0xKEY", "https://rpc.test"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisioningError::InvalidRequest(_)));
        assert_eq!(err.kind(), "invalid_request");
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_run_audits_failure() {
        let h = harness();
        h.chain.set_revert_next_call(true).await;
        let (tx, mut rx) = tokio::sync::mpsc::channel(64);
        let provisioner = h.provisioner.with_audit(AuditHandle::new(tx));

        provisioner
            .run(
                Arc::new(h.dao_client.clone()),
                ProvisioningRequest::new("0xKEY", "https://rpc.test"),
            )
            .await
            .unwrap_err();

        let mut failure = None;
        while let Ok(envelope) = rx.try_recv() {
            if let AuditEvent::RunFailed {
                stage,
                error_kind,
                orphaned_token,
                ..
            } = envelope.event
            {
                failure = Some((stage, error_kind, orphaned_token));
            }
        }

        let (stage, kind, orphaned) = failure.expect("run_failed should be audited");
        assert_eq!(stage, "token_deployed");
        assert_eq!(kind, "transfer_reverted");
        assert!(orphaned.is_some());
    }
}
