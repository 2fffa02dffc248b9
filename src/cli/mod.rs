//! CLI definitions using clap.

use chrono::{DateTime, FixedOffset};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// hubmove - move, revert and export content between hubs
#[derive(Parser, Debug)]
#[command(name = "hubmove", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub hub: HubArgs,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Source hub connection settings.
#[derive(Args, Debug, Clone, Default)]
pub struct HubArgs {
    /// Hub to operate on
    #[arg(long, global = true, env = "HUBMOVE_HUB_ID")]
    pub hub_id: Option<String>,

    /// OAuth client id
    #[arg(long, global = true, env = "HUBMOVE_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, global = true, env = "HUBMOVE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Content API base URL
    #[arg(long, global = true, env = "HUBMOVE_API_URL")]
    pub api_url: Option<String>,

    /// OAuth token endpoint
    #[arg(long, global = true, env = "HUBMOVE_AUTH_URL")]
    pub auth_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Content item operations
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },

    /// Event operations
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Item Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Copy items to another repository, then archive the originals
    Move(MoveArgs),

    /// Copy items to another repository
    Copy(CopyArgs),

    /// Export the items of a repository to JSON files
    Export {
        /// Output directory
        dir: PathBuf,

        /// Repository to export
        #[arg(long)]
        repo_id: String,

        /// Overwrite previously exported files without asking
        #[arg(long, short)]
        force: bool,
    },
}

/// Selection and destination shared by `copy` and `move`.
#[derive(Args, Debug, Clone, Default)]
pub struct CopyArgs {
    /// Source repository; every active item in it is selected
    #[arg(long)]
    pub repo_id: Option<String>,

    /// Select a single item (repeatable); overrides --repo-id
    #[arg(long = "id", value_name = "ID")]
    pub ids: Vec<String>,

    /// Repository receiving the copies
    #[arg(long)]
    pub dst_repo_id: Option<String>,

    /// Destination hub (defaults to the source hub)
    #[arg(long, env = "HUBMOVE_DST_HUB_ID")]
    pub dst_hub_id: Option<String>,

    /// Destination client id (defaults to the source one)
    #[arg(long, env = "HUBMOVE_DST_CLIENT_ID")]
    pub dst_client_id: Option<String>,

    /// Destination client secret (defaults to the source one)
    #[arg(long, env = "HUBMOVE_DST_CLIENT_SECRET", hide_env_values = true)]
    pub dst_client_secret: Option<String>,

    /// Action log to write (default: ~/.hubmove/logs/item-<action>-<millis>.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct MoveArgs {
    #[command(flatten)]
    pub copy: CopyArgs,

    /// Undo the move recorded in this action log instead of moving
    #[arg(long, value_name = "LOG")]
    pub revert: Option<PathBuf>,
}

// ============================================================================
// Event Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum EventCommands {
    /// Export events with their editions and slots to JSON files
    Export {
        /// Output directory
        dir: PathBuf,

        /// Only events starting at or after this date (RFC 3339)
        #[arg(long, value_parser = parse_date)]
        from_date: Option<DateTime<FixedOffset>>,

        /// Only events ending at or before this date (RFC 3339)
        #[arg(long, value_parser = parse_date)]
        to_date: Option<DateTime<FixedOffset>>,

        /// Overwrite previously exported files without asking
        #[arg(long, short)]
        force: bool,
    },
}

fn parse_date(s: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("expected an RFC 3339 date: {e}"))
}
