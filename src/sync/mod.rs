//! Diff and sync engine.
//!
//! This module turns a freshly fetched batch of records into storage
//! changes and an auditable report:
//!
//! - **Diff**: classify each record as created/updated/unchanged against
//!   the stored record at the same `(category, slug)`, by content checksum
//!   only
//! - **Sync**: commit the created/updated records (or preview them with a
//!   dry run), demoting write failures into per-record error entries
//! - **Runner**: the per-source orchestration producing the stable
//!   [`SyncReport`] shape and refreshing the sync-state ledger
//!
//! Partial-failure semantics are the default: one record's write failure
//! never aborts the rest of the batch. Nothing here retries.
//!
//! # Example
//!
//! ```ignore
//! use discus::sync::{sync_source, SyncOptions};
//!
//! let report = sync_source(&client, &store, &source, &SyncOptions::default()).await?;
//! println!("{} created, {} updated", report.created.len(), report.updated.len());
//! ```

mod engine;
mod runner;
mod types;

pub use engine::{diff, sync};
pub use runner::{SyncOptions, sync_source};
pub use types::{DiffResult, RecordStatus, SyncEntry, SyncOutcome, SyncReport};
