//! Sentinel CLI — operator entry point for the security facade.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentinel_core::{Sentinel, SentinelConfig};
use sentinel_vault::QuarantineVault;
use tracing::info;

#[derive(Parser)]
#[command(name = "sentinel")]
#[command(about = "Sentinel - content and traffic security facade")]
struct Cli {
    /// Path to the sentinel.toml configuration file.
    #[arg(short, long, default_value = "config/sentinel.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the facade's configuration and database status.
    Status,
    /// List policies in the policy store.
    ListPolicies,
    /// Show a single policy by id.
    ShowPolicy { id: String },
    /// List everything currently held in quarantine.
    ListQuarantine,
    /// Restore a quarantined file into a destination directory.
    Restore { id: String, destination_dir: PathBuf },
    /// Checkpoint the registry database's write-ahead log.
    Vacuum,
    /// Verify the registry database opens and its schema is current.
    Verify,
    /// Copy the registry database to a backup path.
    Backup { destination: PathBuf },
}

fn load_config(path: &PathBuf) -> anyhow::Result<SentinelConfig> {
    if !path.exists() {
        info!(path = %path.display(), "no config file found, using defaults");
        return Ok(SentinelConfig::default());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(SentinelConfig::from_toml_str(&raw)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Status => {
            println!("registry db: {}", config.registry.db_path.display());
            println!("quarantine dir: {}", config.vault.quarantine_dir.display());
            println!("fail_closed: {}", config.global.fail_closed);
            println!("short_circuit: {}", config.global.short_circuit);
        }
        Commands::ListPolicies => {
            let sentinel = Sentinel::new(config).await?;
            for policy in sentinel.policy_store().list_policies()? {
                println!("{}  {:<30}  {:?}  enabled={}", policy.id, policy.name, policy.action, policy.enabled);
            }
        }
        Commands::ShowPolicy { id } => {
            let sentinel = Sentinel::new(config).await?;
            match sentinel.policy_store().get_policy(&id)? {
                Some(policy) => println!("{}", serde_json::to_string_pretty(&policy)?),
                None => println!("no policy with id {id}"),
            }
        }
        Commands::ListQuarantine => {
            let vault = QuarantineVault::open(&config.vault.quarantine_dir).await?;
            for entry in vault.list_all_entries().await? {
                println!(
                    "{}  {}  {} bytes  detected_at={}",
                    entry.quarantine_id, entry.original_url, entry.file_size, entry.detection_time
                );
            }
        }
        Commands::Restore { id, destination_dir } => {
            let vault = QuarantineVault::open(&config.vault.quarantine_dir).await?;
            let restored = vault.restore_file(&id, &destination_dir).await?;
            println!("restored {id} to {}", restored.display());
        }
        Commands::Vacuum => {
            let sentinel = Sentinel::new(config).await?;
            sentinel.policy_store().flush()?;
            println!("checkpointed registry write-ahead log");
        }
        Commands::Verify => {
            let sentinel = Sentinel::new(config).await?;
            let policy_count = sentinel.policy_store().list_policies()?.len();
            println!("registry opened successfully, {policy_count} polic{} on file", if policy_count == 1 { "y" } else { "ies" });
        }
        Commands::Backup { destination } => {
            tokio::fs::copy(&config.registry.db_path, &destination).await?;
            println!("backed up {} to {}", config.registry.db_path.display(), destination.display());
        }
    }

    Ok(())
}
