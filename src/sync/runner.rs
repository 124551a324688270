//! One-shot sync run for a configured source.
//!
//! Orchestrates the full pipeline: category lookup → paged discussion
//! fetch → normalization → diff/commit → ledger update, producing the
//! [`SyncReport`] consumed by callers. Sources, categories, and records
//! are processed strictly in order; there is no parallel fan-out.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use crate::client::{DEFAULT_HARD_CAP, GithubClient, MAX_PAGE_SIZE};
use crate::config::SourceConfig;
use crate::error::Result;
use crate::model::SourceSyncState;
use crate::normalize::to_record;
use crate::storage::ContentStore;
use crate::sync::engine;
use crate::sync::types::SyncReport;

/// Tunables for one sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Compute classifications without writing anything.
    pub dry_run: bool,
    /// Page size per fetch, clamped to the API maximum.
    pub page_size: usize,
    /// Cap on records retrieved per category; partial results past the cap.
    pub max_records: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            page_size: MAX_PAGE_SIZE,
            max_records: DEFAULT_HARD_CAP,
        }
    }
}

/// Sync one source into the content store and return the report.
///
/// Categories that cannot be found on the repository are logged and
/// skipped; the run continues with the remaining categories. On a
/// non-dry run the per-source ledger entry is refreshed afterwards
/// (last sync time, slug → checksum map, processed count).
///
/// # Errors
///
/// Propagates API failures and storage failures other than per-record
/// write errors, which are reported inside the returned report.
pub async fn sync_source(
    client: &GithubClient,
    store: &ContentStore,
    source: &SourceConfig,
    options: &SyncOptions,
) -> Result<SyncReport> {
    let started = Instant::now();
    let mut batch = Vec::new();

    for category_name in &source.categories {
        let Some(category) = client
            .find_category(&source.owner, &source.repo, category_name)
            .await?
        else {
            warn!(
                source = %source.name,
                category = %category_name,
                "category not found on repository; skipping"
            );
            continue;
        };

        let discussions = client
            .list_discussions(
                &source.owner,
                &source.repo,
                &category.id,
                options.page_size,
                options.max_records,
            )
            .await?;

        info!(
            source = %source.name,
            category = %category_name,
            count = discussions.len(),
            "fetched discussions"
        );

        batch.extend(
            discussions
                .iter()
                .map(|d| to_record(d, source, category_name)),
        );
    }

    let checksums: BTreeMap<String, String> = batch
        .iter()
        .map(|r| (r.slug.clone(), r.checksum.clone()))
        .collect();
    let processed = batch.len();

    let outcome = engine::sync(store, batch, options.dry_run)?;
    let synced_at = Utc::now();

    if !options.dry_run {
        store.update_source_sync_state(
            &source.name,
            SourceSyncState {
                last_sync: Some(synced_at),
                checksums,
                last_sync_count: processed,
            },
        )?;
    }

    Ok(SyncReport {
        source: source.name.clone(),
        success: outcome.errors.is_empty(),
        created: outcome.created,
        updated: outcome.updated,
        unchanged: outcome.unchanged,
        errors: outcome.errors,
        duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        synced_at,
    })
}
