//! Data models for discus.
//!
//! This module contains the canonical stored shapes:
//! - [`Record`] — one normalized content item, persisted as a pretty-printed
//!   JSON file under `<root>/<category>/<slug>.json`
//! - [`SyncState`] / [`SourceSyncState`] — the per-content-root sync ledger
//!
//! Field names serialize as camelCase because the JSON files are consumed
//! directly by the site build.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current sync-state schema revision.
pub const SYNC_STATE_VERSION: u32 = 1;

/// Origin kind of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    /// A GitHub Discussion.
    GithubDiscussion,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GithubDiscussion => write!(f, "github-discussion"),
        }
    }
}

/// One normalized content item.
///
/// Storage key is `(category, slug)`; `external_id` is kept for traceability
/// back to the origin, never as a storage key. `checksum` is a pure function
/// of `body` — metadata changes do not affect it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Stable origin identifier (the configured source name).
    pub source: String,
    /// Origin kind tag.
    pub source_type: SourceType,
    /// Logical grouping, e.g. "People". Case-insensitive; normalized to a
    /// lowercase path segment for storage.
    pub category: String,
    /// Human-readable name, supplied by the origin.
    pub title: String,
    /// URL-safe identifier, deterministically derived from `title`.
    pub slug: String,
    /// Origin-native identifier (discussion number).
    pub external_id: i64,
    /// Deep link back to the origin.
    pub external_url: String,
    /// Wall-clock time of the last successful fetch; rewritten every sync.
    pub retrieved_at: DateTime<Utc>,
    /// Origin-reported last-modification time. Used for ordering only.
    pub updated_at: DateTime<Utc>,
    /// SHA-256 hex fingerprint of `body`, used for change detection.
    pub checksum: String,
    /// Free-form text payload (discussion body markdown).
    pub body: String,
}

/// Per-source sync metadata within the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSyncState {
    /// Time of the last completed sync for this source, if any.
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
    /// Slug → last-known checksum. Informational cache only; the diff
    /// engine recomputes truth from storage.
    #[serde(default)]
    pub checksums: BTreeMap<String, String>,
    /// Number of records processed in the last run.
    #[serde(default)]
    pub last_sync_count: usize,
}

/// The per-content-root sync ledger, persisted as a single JSON file.
///
/// Read-or-default at the start of every sync invocation, rewritten
/// wholesale at the end. Not locked against concurrent writers; a single
/// sync process at a time is assumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    /// Schema revision, read-compatible across minor changes.
    pub version: u32,
    /// Source name → per-source state.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceSyncState>,
    /// Time of the most recent ledger update.
    #[serde(default)]
    pub last_full_sync: Option<DateTime<Utc>>,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            version: SYNC_STATE_VERSION,
            sources: BTreeMap::new(),
            last_full_sync: None,
        }
    }
}
