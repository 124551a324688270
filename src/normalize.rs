//! Record normalization: slugs, checksums, and the discussion → [`Record`]
//! mapping.
//!
//! Everything here is a pure transformation — no I/O. The checksum covers
//! the body text only, so metadata edits (title, category) never change it.

use chrono::Utc;
use sha2::{Digest, Sha256};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::client::Discussion;
use crate::config::SourceConfig;
use crate::model::{Record, SourceType};

/// Derive a URL-safe slug from a title.
///
/// The title is NFKD-decomposed so accented characters split into a base
/// character plus combining marks; the marks are stripped, the rest is
/// lowercased, and every run of non-alphanumeric characters collapses into
/// a single hyphen. Leading and trailing hyphens are trimmed.
///
/// ```
/// use discus::normalize::generate_slug;
///
/// assert_eq!(generate_slug("Niccolò Machiavelli"), "niccolo-machiavelli");
/// assert_eq!(generate_slug("Hello   World"), "hello-world");
/// assert_eq!(generate_slug("---"), "");
/// ```
#[must_use]
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Compute the SHA-256 content checksum of a record body.
///
/// Deterministic and a pure function of the body text: two records with
/// identical bodies produce identical checksums regardless of any other
/// field.
#[must_use]
pub fn checksum(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Map a fetched discussion into a canonical [`Record`].
///
/// `retrieved_at` is stamped with the wall-clock time of normalization,
/// not of the earlier fetch.
#[must_use]
pub fn to_record(discussion: &Discussion, source: &SourceConfig, category: &str) -> Record {
    Record {
        source: source.name.clone(),
        source_type: SourceType::GithubDiscussion,
        category: category.to_string(),
        title: discussion.title.clone(),
        slug: generate_slug(&discussion.title),
        external_id: discussion.number,
        external_url: discussion.url.clone(),
        retrieved_at: Utc::now(),
        updated_at: discussion.updated_at,
        checksum: checksum(&discussion.body),
        body: discussion.body.clone(),
    }
}
