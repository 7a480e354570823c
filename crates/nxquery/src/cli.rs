//! Clap derive structures for the `nxquery` CLI.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use nxquery_core::ListResource;
use strum::IntoEnumIterator;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// nxquery -- run dashboard-style queries against a NetXMS server
#[derive(Debug, Parser)]
#[command(
    name = "nxquery",
    version,
    about = "Query NetXMS alarms, DCI history, summary tables and object queries",
    long_about = "Runs the same typed queries a dashboard data source would send to the\n\
        NetXMS WebAPI and prints the shaped result frames.",
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
    /// Server profile to use
    #[arg(long, short = 'p', env = "NXQUERY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// WebAPI base URL (overrides profile)
    #[arg(long, short = 's', env = "NXQUERY_SERVER", global = true)]
    pub server: Option<String>,

    /// API key (overrides profile, env var and keyring)
    #[arg(long, env = "NXQUERY_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NXQUERY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "NXQUERY_INSECURE", global = true)]
    pub insecure: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty tables (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a batch of queries from a JSON file
    #[command(alias = "q")]
    Query(QueryArgs),

    /// Check connectivity and server version
    Health,

    /// List selectable objects, tables, queries or DCIs
    #[command(alias = "ls")]
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Batch file (`{"queries": [...]}`), or `-` for stdin
    pub input: PathBuf,

    /// Range start (RFC 3339) for queries without their own time range
    #[arg(long)]
    pub from: Option<DateTime<Utc>>,

    /// Range end (RFC 3339); defaults to now
    #[arg(long)]
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Resource to list
    #[arg(value_parser = parse_resource)]
    pub resource: ListResource,

    /// Object whose DCIs to list (required for `dcis`)
    #[arg(long)]
    pub object_id: Option<i64>,
}

fn parse_resource(raw: &str) -> Result<ListResource, String> {
    raw.parse().map_err(|_| {
        let names: Vec<String> = ListResource::iter().map(|r| r.to_string()).collect();
        format!("expected one of: {}", names.join(", "))
    })
}
