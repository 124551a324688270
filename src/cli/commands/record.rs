//! Record inspection commands: list, show, delete.
//!
//! Deletion is the explicit operation the sync engine never performs on
//! its own.

use colored::Colorize;

use crate::cli::Cli;
use crate::error::{Error, Result};

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the category directory cannot be enumerated.
pub fn list(cli: &Cli, category: &str, keys_only: bool) -> Result<()> {
    let store = super::resolve_store(cli)?;

    if keys_only {
        let keys = store.list_keys(category)?;
        if cli.json {
            println!("{}", serde_json::to_string(&keys)?);
        } else {
            for key in keys {
                println!("{key}");
            }
        }
        return Ok(());
    }

    let records = store.list(category)?;

    if cli.json {
        println!("{}", serde_json::to_string(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", format!("No records in category '{category}'.").dimmed());
        return Ok(());
    }

    for record in &records {
        println!(
            "{}  {} ({})",
            record.slug.bold(),
            record.title,
            record.updated_at.format("%Y-%m-%d")
        );
    }
    println!();
    println!("{} records", records.len());

    Ok(())
}

/// Execute the show command.
///
/// # Errors
///
/// Returns `RecordNotFound` if nothing is stored at `(category, slug)`.
pub fn show(cli: &Cli, category: &str, slug: &str) -> Result<()> {
    let store = super::resolve_store(cli)?;

    let record = store
        .read(category, slug)?
        .ok_or_else(|| Error::RecordNotFound {
            category: category.to_string(),
            slug: slug.to_string(),
        })?;

    if cli.json {
        println!("{}", serde_json::to_string(&record)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&record)?);
    }

    Ok(())
}

/// Execute the delete command.
///
/// # Errors
///
/// Returns `RecordNotFound` if nothing is stored at `(category, slug)`.
pub fn delete(cli: &Cli, category: &str, slug: &str) -> Result<()> {
    let store = super::resolve_store(cli)?;

    if !store.delete(category, slug)? {
        return Err(Error::RecordNotFound {
            category: category.to_string(),
            slug: slug.to_string(),
        });
    }

    if cli.json {
        println!(
            "{}",
            serde_json::json!({ "deleted": true, "category": category, "slug": slug })
        );
    } else {
        println!("Deleted {category}/{slug}");
    }

    Ok(())
}
