//! Clap derive structures for the `vouchly` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// vouchly -- guest hotspot voucher management for UniFi controllers
#[derive(Debug, Parser)]
#[command(
    name = "vouchly",
    version,
    about = "Manage UniFi guest hotspot vouchers from the command line",
    long_about = "Create, list, and delete guest hotspot vouchers on a UniFi\n\
        network controller. Works with both UniFi OS consoles and classic\n\
        standalone controllers using local admin credentials.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller host (IP address or hostname, no scheme)
    #[arg(long, short = 'H', env = "VOUCHLY_HOST", global = true)]
    pub host: Option<String>,

    /// Controller HTTPS port (443 for UniFi OS, 8443 for standalone)
    #[arg(long, env = "VOUCHLY_PORT", default_value = "443", global = true)]
    pub port: u16,

    /// Site name
    #[arg(long, short = 's', env = "VOUCHLY_SITE", default_value = "default", global = true)]
    pub site: String,

    /// Local admin username
    #[arg(long, short = 'u', env = "VOUCHLY_USERNAME", global = true)]
    pub username: Option<String>,

    /// Local admin password
    #[arg(long, env = "VOUCHLY_PASSWORD", global = true, hide_env = true)]
    pub password: Option<String>,

    /// Verify the controller's TLS certificate
    #[arg(long, env = "VOUCHLY_VERIFY_TLS", global = true)]
    pub verify_tls: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VOUCHLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds
    #[arg(long, env = "VOUCHLY_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List vouchers
    #[command(alias = "ls")]
    List {
        /// Include expired and fully-used vouchers
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// Generate new vouchers
    Create {
        /// Number of vouchers to generate
        #[arg(long, short = 'n')]
        number: Option<u64>,

        /// Uses per voucher (0 = unlimited)
        #[arg(long)]
        quota: Option<u64>,

        /// Validity in minutes from first use
        #[arg(long, short = 'd')]
        duration: Option<u64>,

        /// Data cap in MB (0 = unlimited)
        #[arg(long)]
        usage_quota: Option<u64>,
    },

    /// Delete a voucher
    Delete {
        /// Voucher ID
        id: String,
    },

    /// Show voucher generation options and their bounds
    Options,

    /// Poll the controller and print each snapshot until interrupted
    Watch {
        /// Poll interval in seconds
        #[arg(long, short = 'i', default_value = "60")]
        interval: u64,
    },
}
