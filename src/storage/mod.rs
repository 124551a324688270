//! Durable storage for records and the sync-state ledger.
//!
//! Records live as one pretty-printed JSON file each, keyed by
//! `(category, slug)` under the content root:
//!
//! ```text
//! <root>/<lowercased-category-with-hyphens>/<slug>.json
//! <root>/.sync-state.json
//! ```
//!
//! Writes are atomic: content goes to a temp file, is synced to disk, then
//! renamed over the target. Reads treat a missing file as an explicit
//! absent value, never an error.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use crate::error::Result;
use crate::model::{Record, SYNC_STATE_VERSION, SourceSyncState, SyncState};

/// File name of the sync-state ledger, directly under the content root.
pub const SYNC_STATE_FILE: &str = ".sync-state.json";

/// File-backed store for records and the sync ledger, rooted at one
/// content directory.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    /// Create a store over the given content root. The directory is created
    /// lazily on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The content root this store is addressing.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Normalize a category name into its storage path segment:
    /// lowercased, whitespace runs replaced with a single hyphen.
    #[must_use]
    pub fn category_dir_name(category: &str) -> String {
        category
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }

    fn category_dir(&self, category: &str) -> PathBuf {
        self.root.join(Self::category_dir_name(category))
    }

    /// Path of the record file for `(category, slug)`.
    #[must_use]
    pub fn record_path(&self, category: &str, slug: &str) -> PathBuf {
        self.category_dir(category).join(format!("{slug}.json"))
    }

    // ── Records ───────────────────────────────────────────────

    /// Serialize a record (pretty-printed) to its derived location,
    /// creating intermediate directories and overwriting unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an error if the record's slug is empty (its file would be a
    /// dotfile invisible to listing), or if serialization or any file
    /// operation fails.
    pub fn write(&self, record: &Record) -> Result<()> {
        if record.slug.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "record slug is empty",
            )
            .into());
        }

        let path = self.record_path(&record.category, &record.slug);
        let content = serde_json::to_string_pretty(record)?;
        atomic_write(&path, &content)?;
        Ok(())
    }

    /// Read the record at `(category, slug)`.
    ///
    /// Absent is `Ok(None)`; any other failure (permissions, invalid JSON)
    /// propagates.
    ///
    /// # Errors
    ///
    /// Returns an error for failures other than the file not existing.
    pub fn read(&self, category: &str, slug: &str) -> Result<Option<Record>> {
        let path = self.record_path(category, slug);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Enumerate all valid records in a category.
    ///
    /// Entries that fail to parse are skipped with a warning, not fatal.
    /// A missing category directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be enumerated.
    pub fn list(&self, category: &str) -> Result<Vec<Record>> {
        let mut records = Vec::new();

        for path in self.record_files(category)? {
            match fs::read_to_string(&path) {
                Ok(raw) => match serde_json::from_str::<Record>(&raw) {
                    Ok(record) => records.push(record),
                    Err(e) => warn!(path = %path.display(), error = %e, "skipping unparseable record"),
                },
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable record"),
            }
        }

        Ok(records)
    }

    /// Enumerate the slugs stored in a category without deserializing
    /// record bodies.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be enumerated.
    pub fn list_keys(&self, category: &str) -> Result<Vec<String>> {
        let keys = self
            .record_files(category)?
            .iter()
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        Ok(keys)
    }

    /// Whether a record exists at `(category, slug)`.
    #[must_use]
    pub fn exists(&self, category: &str, slug: &str) -> bool {
        self.record_path(category, slug).is_file()
    }

    /// Delete the record at `(category, slug)`.
    ///
    /// Returns `true` if something was removed. Sync never calls this;
    /// deletion is an explicit, separate operation.
    ///
    /// # Errors
    ///
    /// Returns an error for failures other than the file not existing.
    pub fn delete(&self, category: &str, slug: &str) -> Result<bool> {
        match fs::remove_file(self.record_path(category, slug)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn record_files(&self, category: &str) -> Result<Vec<PathBuf>> {
        let dir = self.category_dir(category);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files: Vec<PathBuf> = fs::read_dir(&dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();
        Ok(files)
    }

    // ── Sync state ────────────────────────────────────────────

    fn sync_state_path(&self) -> PathBuf {
        self.root.join(SYNC_STATE_FILE)
    }

    /// Load the sync-state ledger, or a zero-value default if nothing has
    /// been persisted yet.
    ///
    /// A stored version differing from the current one is migrated by
    /// stamping the new version and preserving the data.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing ledger cannot be read or parsed.
    pub fn get_sync_state(&self) -> Result<SyncState> {
        let path = self.sync_state_path();
        let mut state: SyncState = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SyncState::default()),
            Err(e) => return Err(e.into()),
        };

        if state.version != SYNC_STATE_VERSION {
            info!(
                from = state.version,
                to = SYNC_STATE_VERSION,
                "migrating sync-state schema version"
            );
            state.version = SYNC_STATE_VERSION;
        }

        Ok(state)
    }

    /// Overwrite the sync-state ledger wholesale.
    ///
    /// Last writer wins on the whole file; concurrent sync runs against
    /// the same content root are out of contract.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn update_sync_state(&self, state: &SyncState) -> Result<()> {
        let content = serde_json::to_string_pretty(state)?;
        atomic_write(&self.sync_state_path(), &content)?;
        Ok(())
    }

    /// Per-source sync state, defaulting to empty for unknown sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    pub fn get_source_sync_state(&self, name: &str) -> Result<SourceSyncState> {
        Ok(self
            .get_sync_state()?
            .sources
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    /// Store per-source sync state, bumping the ledger's `lastFullSync`.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read or written.
    pub fn update_source_sync_state(&self, name: &str, source: SourceSyncState) -> Result<()> {
        let mut state = self.get_sync_state()?;
        state.sources.insert(name.to_string(), source);
        state.last_full_sync = Some(Utc::now());
        self.update_sync_state(&state)
    }

    /// Record counts per category directory, for status display.
    ///
    /// # Errors
    ///
    /// Returns an error if the content root cannot be enumerated.
    pub fn category_counts(&self) -> Result<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        if !self.root.is_dir() {
            return Ok(counts);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                let count = self.record_files(name)?.len();
                counts.insert(name.to_string(), count);
            }
        }

        Ok(counts)
    }
}

/// Write content to a file atomically: temp file, fsync, rename.
///
/// If any step fails, the original file (if any) remains untouched.
fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    fs::rename(&temp_path, path)
}
