//! Firewall backends that actually cut off a process's network access.
//!
//! Both real backends shell out to the system's firewall CLI via
//! `tokio::process::Command` rather than speaking netlink directly — the
//! same approach the rest of this codebase takes toward external tools:
//! invoke the real program, don't reimplement its protocol.

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{IsolatorError, Result};

/// One firewall rule applied for a given pid, tracked so it can be removed
/// again on restore without re-deriving it.
#[derive(Debug, Clone)]
pub struct FirewallRule {
    pub description: String,
}

#[async_trait]
pub trait FirewallBackend: Send + Sync {
    /// Human-readable name, used in logs and the dry-run transcript.
    fn name(&self) -> &'static str;

    async fn is_available() -> Result<bool>
    where
        Self: Sized;

    /// Applies rules that block `pid`'s process from sending or receiving
    /// network traffic. Returns the rules applied, so they can be removed
    /// symmetrically later.
    async fn apply_isolation(&self, pid: i32) -> Result<Vec<FirewallRule>>;

    /// Removes previously applied rules for `pid`.
    async fn remove_isolation(&self, pid: i32, rules: &[FirewallRule]) -> Result<()>;

    /// Removes all rules this backend has ever applied, best-effort, used
    /// during full cleanup when per-pid bookkeeping may be incomplete.
    async fn cleanup_all_rules(&self) -> Result<()>;
}

async fn run_command(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| IsolatorError::BackendCommand(format!("{program}: {e}")))?;

    if !output.status.success() {
        return Err(IsolatorError::BackendCommand(format!(
            "{program} {} exited with {}: {}",
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn chain_name(pid: i32) -> String {
    format!("SENTINEL-ISOLATE-{pid}")
}

pub struct NftablesBackend {
    dry_run: bool,
}

impl NftablesBackend {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        if self.dry_run {
            tracing::info!(backend = "nftables", args = ?args, "dry-run: would execute nft");
            return Ok(String::new());
        }
        run_command("nft", args).await
    }
}

#[async_trait]
impl FirewallBackend for NftablesBackend {
    fn name(&self) -> &'static str {
        "nftables"
    }

    async fn is_available() -> Result<bool> {
        Ok(run_command("nft", &["--version"]).await.is_ok())
    }

    async fn apply_isolation(&self, pid: i32) -> Result<Vec<FirewallRule>> {
        let chain = chain_name(pid);
        self.run(&["add", "table", "inet", &chain]).await?;
        self.run(&["add", "chain", "inet", &chain, "output", "{", "type", "filter", "hook", "output", "priority", "0", ";", "}"]).await?;
        let meta_match = format!("meta skuid {pid}");
        self.run(&["add", "rule", "inet", &chain, "output", &meta_match, "drop"]).await?;

        Ok(vec![FirewallRule {
            description: format!("nftables table inet {chain}"),
        }])
    }

    async fn remove_isolation(&self, pid: i32, _rules: &[FirewallRule]) -> Result<()> {
        let chain = chain_name(pid);
        self.run(&["delete", "table", "inet", &chain]).await.ok();
        Ok(())
    }

    async fn cleanup_all_rules(&self) -> Result<()> {
        tracing::debug!("nftables cleanup_all_rules is per-chain; nothing global to sweep");
        Ok(())
    }
}

pub struct IptablesBackend {
    dry_run: bool,
}

impl IptablesBackend {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        if self.dry_run {
            tracing::info!(backend = "iptables", args = ?args, "dry-run: would execute iptables");
            return Ok(String::new());
        }
        run_command("iptables", args).await
    }
}

#[async_trait]
impl FirewallBackend for IptablesBackend {
    fn name(&self) -> &'static str {
        "iptables"
    }

    async fn is_available() -> Result<bool> {
        Ok(run_command("iptables", &["--version"]).await.is_ok())
    }

    async fn apply_isolation(&self, pid: i32) -> Result<Vec<FirewallRule>> {
        let uid = pid.to_string();
        self.run(&["-A", "OUTPUT", "-m", "owner", "--uid-owner", &uid, "-j", "DROP"]).await?;
        Ok(vec![FirewallRule {
            description: format!("iptables OUTPUT DROP uid-owner {uid}"),
        }])
    }

    async fn remove_isolation(&self, pid: i32, _rules: &[FirewallRule]) -> Result<()> {
        let uid = pid.to_string();
        self.run(&["-D", "OUTPUT", "-m", "owner", "--uid-owner", &uid, "-j", "DROP"]).await.ok();
        Ok(())
    }

    async fn cleanup_all_rules(&self) -> Result<()> {
        tracing::debug!("iptables cleanup_all_rules relies on per-pid remove_isolation calls");
        Ok(())
    }
}
