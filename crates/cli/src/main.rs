mod backend;
mod cli;
mod metrics;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sha2::{Digest, Sha256};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use daoforge_core::{
    create_audit_system, load_config, validate_config, AuditEvent, AuditFilter, AuditHandle,
    AuditStore, Config, ContractArtifact, DaoProvisioner, ProvisionerSettings,
    ProvisioningRequest, ResultStore, SanitizedConfig, SqliteAuditStore, SqliteResultStore,
};

use backend::Backend;
use cli::{Cli, Command};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Buffer size for audit event channel
const AUDIT_BUFFER_SIZE: usize = 1000;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    validate_config(&config).context("Configuration validation failed")?;

    init_logging(config.logging.json);
    info!(config = ?cli.config, backend = ?config.chain.backend, "Configuration loaded");

    let outcome = match cli.command {
        Command::Provision { admin_key, rpc_url } => {
            let rpc_url = rpc_url.unwrap_or_else(|| config.chain.rpc_url.clone());
            provision(&config, admin_key, rpc_url).await
        }
        Command::Show => show(&config),
        Command::History { run_id, limit } => history(&config, run_id, limit),
        Command::CheckConfig => check_config(&config),
    };

    finish(&config, outcome)
}

/// Flushes the metrics textfile, failed commands included, then hands back
/// the command outcome.
fn finish(config: &Config, outcome: Result<()>) -> Result<()> {
    if let Some(path) = &config.metrics.textfile_path {
        if let Err(e) = metrics::write_textfile(path) {
            warn!("Failed to write metrics textfile: {:#}", e);
        }
    }
    outcome
}

fn check_config(config: &Config) -> Result<()> {
    let sanitized = SanitizedConfig::from(config);
    println!("{}", serde_json::to_string_pretty(&sanitized)?);
    Ok(())
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn config_hash(config: &Config) -> String {
    let config_json = serde_json::to_string(&SanitizedConfig::from(config)).unwrap_or_default();
    format!("{:x}", Sha256::digest(config_json.as_bytes()))[..16].to_string()
}

fn start_audit(database: &Path) -> Result<(AuditHandle, JoinHandle<()>)> {
    let audit_store: Arc<dyn AuditStore> = Arc::new(
        SqliteAuditStore::new(database).context("Failed to create audit store")?,
    );
    let (handle, writer) = create_audit_system(audit_store, AUDIT_BUFFER_SIZE);
    Ok((handle, tokio::spawn(writer.run())))
}

async fn provision(config: &Config, admin_key: String, rpc_url: String) -> Result<()> {
    let artifact = ContractArtifact::from_file(&config.token.artifact_path)
        .context("Failed to load token artifact")?;
    let store: Arc<dyn ResultStore> = Arc::new(
        SqliteResultStore::new(&config.database.path).context("Failed to create result store")?,
    );
    let (audit, writer_task) = start_audit(&config.database.path)?;

    audit
        .emit(AuditEvent::ServiceStarted {
            version: VERSION.to_string(),
            config_hash: config_hash(config),
        })
        .await;

    let backend = Backend::from_config(&config.chain);
    let provisioner = DaoProvisioner::new(
        ProvisionerSettings::from_config(config),
        backend.bundler,
        backend.chain,
        Arc::new(artifact),
        store,
    )
    .with_audit(audit.clone());

    let outcome = provisioner
        .run(
            backend.dao_client,
            ProvisioningRequest::new(admin_key, rpc_url),
        )
        .await;

    let reason = match &outcome {
        Ok(_) => "provisioning succeeded".to_string(),
        Err(e) => format!("provisioning failed: {}", e.kind()),
    };
    audit.emit(AuditEvent::ServiceStopped { reason }).await;

    // The writer exits once every handle is gone.
    drop(provisioner);
    drop(audit);
    if let Err(e) = writer_task.await {
        warn!("Audit writer task failed: {}", e);
    }

    let result = outcome.context("Provisioning failed")?;
    println!("{}", result.dao_address);
    Ok(())
}

fn show(config: &Config) -> Result<()> {
    let store = SqliteResultStore::new(&config.database.path)
        .context("Failed to open result store")?;
    match store.load().context("Failed to read result store")? {
        Some(persisted) => println!("{}", serde_json::to_string_pretty(&persisted)?),
        None => anyhow::bail!("No provisioning result recorded in {:?}", config.database.path),
    }
    Ok(())
}

fn history(config: &Config, run_id: Option<String>, limit: i64) -> Result<()> {
    let store =
        SqliteAuditStore::new(&config.database.path).context("Failed to open audit store")?;

    let mut filter = AuditFilter::new().with_limit(limit);
    if let Some(run_id) = run_id {
        filter = filter.with_run_id(run_id);
    }

    for record in store.query(&filter).context("Failed to query audit events")? {
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}
