//! Status command: the sync ledger and stored record counts.

use colored::Colorize;

use crate::cli::Cli;
use crate::error::Result;

/// Execute the status command.
///
/// # Errors
///
/// Returns an error if the ledger or the content tree cannot be read.
pub fn execute(cli: &Cli) -> Result<()> {
    let store = super::resolve_store(cli)?;
    let state = store.get_sync_state()?;
    let counts = store.category_counts()?;

    if cli.json {
        let output = serde_json::json!({
            "contentRoot": store.root().display().to_string(),
            "state": state,
            "categories": counts,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", "Sync Status".bold().underline());
    println!();
    println!("Content root: {}", store.root().display());

    match &state.last_full_sync {
        Some(t) => println!("Last sync:    {}", t.to_rfc3339()),
        None => println!("Last sync:    {}", "never".dimmed()),
    }
    println!();

    if state.sources.is_empty() {
        println!("{}", "No sources have been synced yet.".dimmed());
    } else {
        println!("{}", "Sources:".blue().bold());
        for (name, source) in &state.sources {
            let last = source
                .last_sync
                .map_or_else(|| "never".to_string(), |t| t.to_rfc3339());
            println!(
                "  {name}: {} records, last sync {last}",
                source.last_sync_count
            );
        }
    }
    println!();

    if counts.is_empty() {
        println!("{}", "No records stored.".dimmed());
    } else {
        println!("{}", "Stored records:".blue().bold());
        let mut total = 0;
        for (category, count) in &counts {
            println!("  {category}: {count}");
            total += count;
        }
        println!("  {}: {total}", "Total".bold());
    }

    Ok(())
}
