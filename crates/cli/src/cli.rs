//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "daoforge", version, about = "Provision DAOs with token-weighted voting")]
pub struct Cli {
    /// Configuration file
    #[arg(
        long,
        global = true,
        env = "DAOFORGE_CONFIG",
        default_value = "daoforge.toml"
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the provisioning pipeline and print the new DAO address
    Provision {
        /// Admin signing key
        #[arg(long, env = "DAOFORGE_ADMIN_KEY", hide_env_values = true)]
        admin_key: String,

        /// RPC endpoint, overriding chain.rpc_url
        #[arg(long)]
        rpc_url: Option<String>,
    },

    /// Print the last persisted provisioning result as JSON
    Show,

    /// List audit events, oldest first
    History {
        /// Only events of this run
        #[arg(long)]
        run_id: Option<String>,

        /// Maximum number of events
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },

    /// Validate the configuration and print it with secrets redacted
    CheckConfig,
}
