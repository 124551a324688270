//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// discus - sync GitHub Discussions into a local JSON content tree
#[derive(Parser, Debug)]
#[command(name = "discus", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (default: ./discus.json)
    #[arg(long, global = true, env = "DISCUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Content root override (default: from config)
    #[arg(long, global = true, env = "DISCUS_ROOT")]
    pub root: Option<PathBuf>,

    /// Output as JSON (for automation)
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

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch discussions and sync them into the content tree
    Sync {
        /// Sync only the named source (default: all configured sources)
        #[arg(long)]
        source: Option<String>,

        /// Classify records without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Page size per API fetch (capped at 100)
        #[arg(long, default_value = "100")]
        page_size: usize,

        /// Maximum records to retrieve per category
        #[arg(long, default_value = "1000")]
        max_records: usize,
    },

    /// Show the sync ledger and stored record counts
    Status,

    /// List stored records in a category
    List {
        /// Category name, e.g. "People"
        category: String,

        /// Print slugs only
        #[arg(long)]
        keys: bool,
    },

    /// Print one stored record as JSON
    Show {
        /// Category name
        category: String,

        /// Record slug
        slug: String,
    },

    /// Delete one stored record
    Delete {
        /// Category name
        category: String,

        /// Record slug
        slug: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Print version information
    Version,
}
