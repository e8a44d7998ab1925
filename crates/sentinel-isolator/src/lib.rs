//! Network isolation of processes identified as malicious.
//!
//! Cuts a process (and, on request, its whole descendant tree) off from
//! the network by shelling out to whichever firewall CLI is available
//! (`nft` preferred, `iptables` as fallback), tracks what it applied so it
//! can undo exactly that, and watches for the process exiting so
//! isolation doesn't outlive its target.
//!
//! A small static refusal list (PID 1, and named infrastructure daemons
//! like `sshd`/`systemd-resolved`/`NetworkManager`) prevents the isolator
//! from ever being pointed at something that would take the host off the
//! network entirely.

pub mod backend;
pub mod error;
pub mod manager;
pub mod process;

pub use backend::{FirewallBackend, FirewallRule, IptablesBackend, NftablesBackend};
pub use error::IsolatorError;
pub use manager::{Backend, IsolatedProcess, IsolationStatistics, NetworkIsolationManager};
pub use process::{is_critical_process, process_tree, MockProcessTable, ProcFsTable, ProcessTable};

pub type Result<T> = std::result::Result<T, IsolatorError>;
