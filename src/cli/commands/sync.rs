//! Sync command implementation.
//!
//! Runs the fetch → normalize → diff → commit pipeline for one or all
//! configured sources, printing a per-source report. Sources are
//! processed sequentially; a failed source is reported and does not stop
//! the remaining ones.

use colored::Colorize;

use crate::cli::Cli;
use crate::client::GithubClient;
use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::storage::ContentStore;
use crate::sync::{SyncOptions, SyncReport, sync_source};

/// Execute the sync command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, the named source is
/// unknown, or every selected source fails.
pub fn execute(
    cli: &Cli,
    source_name: Option<&str>,
    dry_run: bool,
    page_size: usize,
    max_records: usize,
) -> Result<()> {
    let config = super::load_config(cli)?;

    let selected: Vec<&SourceConfig> = match source_name {
        Some(name) => vec![config.source(name).ok_or_else(|| {
            Error::SourceNotConfigured {
                name: name.to_string(),
            }
        })?],
        None => config.sources.iter().collect(),
    };

    if selected.is_empty() {
        return Err(Error::Config("no sources configured".into()));
    }

    let root = cli.root.clone().unwrap_or_else(|| config.content_root.clone());
    let store = ContentStore::new(root);
    let client = GithubClient::from_env();
    let options = SyncOptions {
        dry_run,
        page_size,
        max_records,
    };

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;

    let total = selected.len();
    let mut failed = 0;
    for source in selected {
        match rt.block_on(sync_source(&client, &store, source, &options)) {
            Ok(report) => {
                if cli.json {
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    print_report(&report, dry_run);
                }
            }
            Err(e) => {
                // With a single source the error propagates as-is, keeping
                // its category exit code.
                if total == 1 {
                    return Err(e);
                }
                if cli.json {
                    eprintln!("{}", e.to_structured_json());
                } else {
                    eprintln!("{} syncing '{}': {e}", "Error".red().bold(), source.name);
                }
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(Error::Sync(format!("{failed} of {total} sources failed")));
    }
    Ok(())
}

fn print_report(report: &SyncReport, dry_run: bool) {
    let heading = if dry_run {
        format!("Dry run for '{}'", report.source)
    } else {
        format!("Synced '{}'", report.source)
    };
    println!("{}", heading.bold().underline());
    println!();

    for entry in &report.created {
        println!("  {} {}/{}", "created".green(), entry.category, entry.slug);
    }
    for entry in &report.updated {
        println!("  {} {}/{}", "updated".yellow(), entry.category, entry.slug);
    }
    for entry in &report.errors {
        println!(
            "  {} {}/{}: {}",
            "error".red(),
            entry.category,
            entry.slug,
            entry.message.as_deref().unwrap_or("unknown failure")
        );
    }

    if !report.has_changes() && report.errors.is_empty() {
        println!("  {}", "Everything up to date.".dimmed());
    }

    println!();
    println!(
        "  {} created, {} updated, {} unchanged, {} errors ({} records, {} ms)",
        report.created.len(),
        report.updated.len(),
        report.unchanged.len(),
        report.errors.len(),
        report.total(),
        report.duration_ms
    );

    if dry_run {
        println!("  {}", "No files were written.".dimmed());
    }
}
