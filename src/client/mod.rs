//! GitHub GraphQL API client.
//!
//! This module performs authenticated request/response cycles against the
//! GitHub GraphQL endpoint and surfaces typed failures:
//!
//! - **Transport**: one `POST {query, variables}` per call, bearer auth,
//!   fixed user agent. No retries, no response caching.
//! - **Errors**: the full taxonomy in [`ApiError`] — missing auth, 401,
//!   rate-limit-aware 403 handling, other transport failures, GraphQL
//!   body errors, and empty responses.
//! - **Pagination**: [`collect_pages`] follows cursors until the origin
//!   reports no more pages or a hard cap is reached.
//! - **Category lookup**: case-insensitive name matching with a
//!   per-client memo cache.
//!
//! # Example
//!
//! ```ignore
//! use discus::client::GithubClient;
//! use discus::config::ClientConfig;
//!
//! let client = GithubClient::new(ClientConfig::from_env());
//! let category = client.find_category("acme", "wiki", "People").await?;
//! if let Some(category) = category {
//!     let discussions = client
//!         .list_discussions("acme", "wiki", &category.id, 100, 1000)
//!         .await?;
//! }
//! ```

mod discussions;
mod graphql;

pub use discussions::{Discussion, DiscussionCategory};
pub use graphql::{
    ApiError, DEFAULT_HARD_CAP, GithubClient, MAX_PAGE_SIZE, Page, classify_failure,
    collect_pages,
};
