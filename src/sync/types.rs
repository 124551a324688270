//! Report shapes for diff and sync operations.
//!
//! [`SyncReport`] is the stable contract consumed by calling CLIs and CI
//! workflows (PR bodies, step summaries); its field names must not change.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::Record;

/// Classification of one record against the existing storage state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// No stored record existed at `(category, slug)`.
    Created,
    /// A stored record existed with a differing checksum.
    Updated,
    /// A stored record existed with an equal checksum.
    Unchanged,
    /// The write for a created/updated record failed.
    Error,
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One record's entry in a sync report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncEntry {
    pub slug: String,
    pub title: String,
    pub category: String,
    pub status: RecordStatus,
    /// Failure message; present only on `error` entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SyncEntry {
    /// Build an entry from a record with the given status.
    #[must_use]
    pub fn from_record(record: &Record, status: RecordStatus) -> Self {
        Self {
            slug: record.slug.clone(),
            title: record.title.clone(),
            category: record.category.clone(),
            status,
            message: None,
        }
    }

    /// Build an `error` entry carrying a failure message.
    #[must_use]
    pub fn error(record: &Record, message: String) -> Self {
        Self {
            slug: record.slug.clone(),
            title: record.title.clone(),
            category: record.category.clone(),
            status: RecordStatus::Error,
            message: Some(message),
        }
    }
}

/// Classification buckets produced by a diff over one category.
///
/// Every incoming record lands in exactly one bucket.
#[derive(Debug, Default)]
pub struct DiffResult {
    pub created: Vec<Record>,
    pub updated: Vec<Record>,
    pub unchanged: Vec<Record>,
}

impl DiffResult {
    /// Total records classified.
    #[must_use]
    pub fn total(&self) -> usize {
        self.created.len() + self.updated.len() + self.unchanged.len()
    }
}

/// Classification and commit results for one batch.
///
/// A record appears in exactly one bucket: write failures move the record
/// from its created/updated bucket into `errors`, never duplicating it.
#[derive(Debug, Default, Serialize)]
pub struct SyncOutcome {
    pub created: Vec<SyncEntry>,
    pub updated: Vec<SyncEntry>,
    pub unchanged: Vec<SyncEntry>,
    pub errors: Vec<SyncEntry>,
}

impl SyncOutcome {
    /// Total records processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.created.len() + self.updated.len() + self.unchanged.len() + self.errors.len()
    }
}

/// The full report for one source sync run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Configured source name.
    pub source: String,
    /// True when no record-level errors occurred.
    pub success: bool,
    pub created: Vec<SyncEntry>,
    pub updated: Vec<SyncEntry>,
    pub unchanged: Vec<SyncEntry>,
    pub errors: Vec<SyncEntry>,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
    /// Completion time of the run.
    pub synced_at: DateTime<Utc>,
}

impl SyncReport {
    /// Total records in the report.
    #[must_use]
    pub fn total(&self) -> usize {
        self.created.len() + self.updated.len() + self.unchanged.len() + self.errors.len()
    }

    /// Whether anything was (or would be) written.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.created.is_empty() || !self.updated.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RecordStatus::Created).unwrap(),
            "\"created\""
        );
        assert_eq!(RecordStatus::Unchanged.to_string(), "unchanged");
    }

    #[test]
    fn test_report_has_changes() {
        let entry = SyncEntry {
            slug: "marcus-aurelius".into(),
            title: "Marcus Aurelius".into(),
            category: "People".into(),
            status: RecordStatus::Unchanged,
            message: None,
        };
        let mut report = SyncReport {
            source: "demo".into(),
            success: true,
            created: vec![],
            updated: vec![],
            unchanged: vec![entry.clone()],
            errors: vec![],
            duration_ms: 3,
            synced_at: Utc::now(),
        };
        assert!(!report.has_changes());

        report.updated.push(SyncEntry {
            status: RecordStatus::Updated,
            ..entry
        });
        assert!(report.has_changes());
    }

    #[test]
    fn test_entry_message_omitted_when_absent() {
        let entry = SyncEntry {
            slug: "marcus-aurelius".into(),
            title: "Marcus Aurelius".into(),
            category: "People".into(),
            status: RecordStatus::Created,
            message: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("message").is_none());
        assert_eq!(json["status"], "created");
    }
}
