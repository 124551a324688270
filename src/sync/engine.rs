//! Checksum-based diff and batch sync against a [`ContentStore`].
//!
//! The diff is a one-shot computation over a batch: for each incoming
//! record, the stored record at the same `(category, slug)` decides the
//! classification. Equality is by content checksum only — metadata drift
//! (a title edit with an identical body) deliberately classifies as
//! unchanged and leaves the stored file untouched.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Result;
use crate::model::Record;
use crate::storage::ContentStore;
use crate::sync::types::{DiffResult, RecordStatus, SyncEntry, SyncOutcome};

/// Classify a batch of records for one category against storage.
///
/// - No stored record at `(category, slug)` → created
/// - Stored record with a differing checksum → updated
/// - Stored record with an equal checksum → unchanged
///
/// # Errors
///
/// Propagates storage read failures other than "not found" (which is the
/// created case, not an error).
pub fn diff(store: &ContentStore, records: Vec<Record>, category: &str) -> Result<DiffResult> {
    let mut result = DiffResult::default();

    for record in records {
        match store.read(category, &record.slug)? {
            None => result.created.push(record),
            Some(existing) if existing.checksum != record.checksum => result.updated.push(record),
            Some(_) => result.unchanged.push(record),
        }
    }

    debug!(
        category,
        created = result.created.len(),
        updated = result.updated.len(),
        unchanged = result.unchanged.len(),
        "diffed batch"
    );

    Ok(result)
}

/// Diff a batch (which may span multiple categories) and commit the
/// changes.
///
/// Records are grouped by category and diffed per group. A record whose
/// slug is empty goes straight into `errors`. Unless `dry_run` is set,
/// every created/updated record is written; a write failure demotes that
/// record from its bucket into `errors` and the rest of the batch
/// proceeds. With `dry_run`, classification buckets are fully
/// populated but nothing is written.
///
/// # Errors
///
/// Propagates storage read failures from the diff. Write failures are
/// reported per record inside the outcome, not raised.
pub fn sync(store: &ContentStore, records: Vec<Record>, dry_run: bool) -> Result<SyncOutcome> {
    let mut outcome = SyncOutcome::default();

    let mut groups: BTreeMap<String, Vec<Record>> = BTreeMap::new();
    for record in records {
        // An empty slug has no valid storage path; the record cannot be
        // classified, let alone written.
        if record.slug.is_empty() {
            outcome
                .errors
                .push(SyncEntry::error(&record, "empty slug derived from title".into()));
            continue;
        }
        groups.entry(record.category.clone()).or_default().push(record);
    }

    for (category, group) in groups {
        let diffed = diff(store, group, &category)?;

        for record in diffed.created {
            commit(store, &record, RecordStatus::Created, dry_run, &mut outcome);
        }
        for record in diffed.updated {
            commit(store, &record, RecordStatus::Updated, dry_run, &mut outcome);
        }
        for record in diffed.unchanged {
            outcome
                .unchanged
                .push(SyncEntry::from_record(&record, RecordStatus::Unchanged));
        }
    }

    Ok(outcome)
}

/// Write one created/updated record, or record the failure.
///
/// The entry lands in exactly one bucket: the status bucket on success,
/// `errors` on failure.
fn commit(
    store: &ContentStore,
    record: &Record,
    status: RecordStatus,
    dry_run: bool,
    outcome: &mut SyncOutcome,
) {
    let bucket = match status {
        RecordStatus::Created => &mut outcome.created,
        RecordStatus::Updated => &mut outcome.updated,
        // Only created/updated records are committed
        RecordStatus::Unchanged | RecordStatus::Error => unreachable!(),
    };

    if dry_run {
        bucket.push(SyncEntry::from_record(record, status));
        return;
    }

    match store.write(record) {
        Ok(()) => bucket.push(SyncEntry::from_record(record, status)),
        Err(e) => outcome.errors.push(SyncEntry::error(record, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceType;
    use crate::normalize::{checksum, generate_slug};
    use chrono::Utc;
    use tempfile::TempDir;

    fn make_record(category: &str, title: &str, body: &str) -> Record {
        Record {
            source: "demo".into(),
            source_type: SourceType::GithubDiscussion,
            category: category.into(),
            title: title.into(),
            slug: generate_slug(title),
            external_id: 1,
            external_url: "https://github.com/acme/wiki/discussions/1".into(),
            retrieved_at: Utc::now(),
            updated_at: Utc::now(),
            checksum: checksum(body),
            body: body.into(),
        }
    }

    #[test]
    fn test_diff_classification() {
        let temp_dir = TempDir::new().unwrap();
        let store = ContentStore::new(temp_dir.path());

        store
            .write(&make_record("People", "Seneca", "Stoic philosopher"))
            .unwrap();
        store
            .write(&make_record("People", "Cicero", "Orator"))
            .unwrap();

        let batch = vec![
            make_record("People", "Marcus Aurelius", "Roman Emperor"), // absent
            make_record("People", "Seneca", "Stoic philosopher and statesman"), // changed body
            make_record("People", "Cicero", "Orator"),                 // same body
        ];

        let result = diff(&store, batch, "People").unwrap();
        assert_eq!(result.created.len(), 1);
        assert_eq!(result.created[0].slug, "marcus-aurelius");
        assert_eq!(result.updated.len(), 1);
        assert_eq!(result.updated[0].slug, "seneca");
        assert_eq!(result.unchanged.len(), 1);
        assert_eq!(result.unchanged[0].slug, "cicero");
        assert_eq!(result.total(), 3);
    }

    #[test]
    fn test_diff_ignores_metadata_drift() {
        let temp_dir = TempDir::new().unwrap();
        let store = ContentStore::new(temp_dir.path());

        store
            .write(&make_record("People", "Marcus Aurelius", "Roman Emperor"))
            .unwrap();

        // Title edit producing the same slug, body identical: unchanged
        let mut renamed = make_record("People", "Marcus  Aurelius", "Roman Emperor");
        renamed.title = "Marcus AURELIUS".into();
        let result = diff(&store, vec![renamed], "People").unwrap();
        assert_eq!(result.unchanged.len(), 1);
        assert!(result.updated.is_empty());
    }

    #[test]
    fn test_sync_end_to_end_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = ContentStore::new(temp_dir.path());
        let batch = vec![make_record("People", "Marcus Aurelius", "Roman Emperor")];

        let first = sync(&store, batch.clone(), false).unwrap();
        assert_eq!(first.created.len(), 1);
        assert_eq!(first.created[0].slug, "marcus-aurelius");
        assert_eq!(first.created[0].status, RecordStatus::Created);
        assert!(store.exists("People", "marcus-aurelius"));

        // Second run with the same input is all-unchanged
        let second = sync(&store, batch, false).unwrap();
        assert!(second.created.is_empty());
        assert!(second.updated.is_empty());
        assert_eq!(second.unchanged.len(), 1);
        assert_eq!(second.unchanged[0].status, RecordStatus::Unchanged);
    }

    #[test]
    fn test_sync_spans_multiple_categories() {
        let temp_dir = TempDir::new().unwrap();
        let store = ContentStore::new(temp_dir.path());

        let batch = vec![
            make_record("People", "Marcus Aurelius", "Roman Emperor"),
            make_record("Organizations", "Roman Senate", "Deliberative body"),
        ];

        let outcome = sync(&store, batch, false).unwrap();
        assert_eq!(outcome.created.len(), 2);
        assert!(store.exists("People", "marcus-aurelius"));
        assert!(store.exists("Organizations", "roman-senate"));
    }

    #[test]
    fn test_dry_run_does_not_mutate() {
        let temp_dir = TempDir::new().unwrap();
        let store = ContentStore::new(temp_dir.path());

        let batch = vec![make_record("People", "Marcus Aurelius", "Roman Emperor")];
        let outcome = sync(&store, batch, true).unwrap();

        // Buckets fully populated, storage untouched
        assert_eq!(outcome.created.len(), 1);
        assert!(!store.exists("People", "marcus-aurelius"));
    }

    #[test]
    fn test_empty_slug_demotes_into_errors() {
        let temp_dir = TempDir::new().unwrap();
        let store = ContentStore::new(temp_dir.path());

        let batch = vec![
            make_record("People", "!!!", "no alphanumerics in the title"),
            make_record("People", "Marcus Aurelius", "Roman Emperor"),
        ];

        let outcome = sync(&store, batch, false).unwrap();

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].slug, "");
        assert_eq!(outcome.errors[0].status, RecordStatus::Error);
        assert_eq!(outcome.created.len(), 1);
        assert!(!temp_dir.path().join("people/.json").exists());
    }

    #[test]
    fn test_write_failure_demotes_into_errors() {
        let temp_dir = TempDir::new().unwrap();
        let store = ContentStore::new(temp_dir.path());

        // A directory squatting on one record's target path makes the
        // rename fail for that record only.
        std::fs::create_dir_all(temp_dir.path().join("people/bad-entry.json")).unwrap();

        let batch = vec![
            make_record("People", "Bad Entry", "will fail"),
            make_record("People", "Marcus Aurelius", "Roman Emperor"),
        ];

        let outcome = sync(&store, batch, false).unwrap();

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].slug, "bad-entry");
        assert_eq!(outcome.errors[0].status, RecordStatus::Error);
        assert!(outcome.errors[0].message.is_some());

        // Not double-counted in created
        assert_eq!(outcome.created.len(), 1);
        assert_eq!(outcome.created[0].slug, "marcus-aurelius");
        assert!(store.exists("People", "marcus-aurelius"));
        assert_eq!(outcome.total(), 2);
    }
}
