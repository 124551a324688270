//! Discussion listing and category lookup.
//!
//! Query documents and response DTOs for the discussion endpoints, plus the
//! paged listing built on [`collect_pages`] and the memoized category
//! lookup.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::client::graphql::{ApiError, GithubClient, MAX_PAGE_SIZE, Page, collect_pages};

const DISCUSSIONS_QUERY: &str = r"
query($owner: String!, $repo: String!, $categoryId: ID!, $first: Int!, $after: String) {
  repository(owner: $owner, name: $repo) {
    discussions(categoryId: $categoryId, first: $first, after: $after,
                orderBy: {field: UPDATED_AT, direction: DESC}) {
      pageInfo { hasNextPage endCursor }
      nodes { id number title body url createdAt updatedAt }
    }
  }
}";

const CATEGORIES_QUERY: &str = r"
query($owner: String!, $repo: String!) {
  repository(owner: $owner, name: $repo) {
    discussionCategories(first: 100) {
      nodes { id name }
    }
  }
}";

/// One discussion as returned by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    /// Opaque node ID.
    pub id: String,
    /// Discussion number, unique within the repository.
    pub number: i64,
    pub title: String,
    pub body: String,
    /// Deep link back to the discussion.
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A discussion category.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscussionCategory {
    /// Opaque node ID, used as the `categoryId` filter.
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct DiscussionsData {
    repository: Option<DiscussionsRepository>,
}

#[derive(Debug, Deserialize)]
struct DiscussionsRepository {
    discussions: DiscussionConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscussionConnection {
    page_info: PageInfo,
    nodes: Vec<Discussion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoriesData {
    repository: Option<CategoriesRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoriesRepository {
    discussion_categories: CategoryConnection,
}

#[derive(Debug, Deserialize)]
struct CategoryConnection {
    nodes: Vec<DiscussionCategory>,
}

impl GithubClient {
    /// List all discussions in a category, following pagination.
    ///
    /// `page_size` is clamped to the API maximum of 100. Retrieval stops
    /// when the origin reports no further pages or `hard_cap` items have
    /// been collected; hitting the cap returns the partial result.
    ///
    /// # Errors
    ///
    /// Propagates the first failed page fetch.
    pub async fn list_discussions(
        &self,
        owner: &str,
        repo: &str,
        category_id: &str,
        page_size: usize,
        hard_cap: usize,
    ) -> Result<Vec<Discussion>, ApiError> {
        let first = page_size.clamp(1, MAX_PAGE_SIZE);

        collect_pages(hard_cap, |cursor| {
            self.discussion_page(owner, repo, category_id, first, cursor)
        })
        .await
    }

    async fn discussion_page(
        &self,
        owner: &str,
        repo: &str,
        category_id: &str,
        first: usize,
        after: Option<String>,
    ) -> Result<Page<Discussion>, ApiError> {
        let variables = serde_json::json!({
            "owner": owner,
            "repo": repo,
            "categoryId": category_id,
            "first": first,
            "after": after,
        });

        let data: DiscussionsData = self.request(DISCUSSIONS_QUERY, variables).await?;
        let connection = data.repository.ok_or(ApiError::NoData)?.discussions;

        debug!(
            count = connection.nodes.len(),
            has_next = connection.page_info.has_next_page,
            "fetched discussion page"
        );

        Ok(Page {
            nodes: connection.nodes,
            has_next_page: connection.page_info.has_next_page,
            end_cursor: connection.page_info.end_cursor,
        })
    }

    /// Look up a discussion category by name, case-insensitively.
    ///
    /// A miss is an explicit `None`, not an error. Hits are memoized per
    /// client instance for the duration of a run; see
    /// [`GithubClient::clear_category_cache`].
    ///
    /// # Errors
    ///
    /// Propagates request failures from the category listing.
    pub async fn find_category(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
    ) -> Result<Option<DiscussionCategory>, ApiError> {
        let key = format!("{owner}/{repo}#{}", name.to_lowercase());

        if let Ok(cache) = self.category_cache.lock() {
            if let Some(hit) = cache.get(&key) {
                return Ok(Some(hit.clone()));
            }
        }

        let variables = serde_json::json!({ "owner": owner, "repo": repo });
        let data: CategoriesData = self.request(CATEGORIES_QUERY, variables).await?;
        let categories = data
            .repository
            .ok_or(ApiError::NoData)?
            .discussion_categories
            .nodes;

        let wanted = name.to_lowercase();
        let found = categories
            .into_iter()
            .find(|c| c.name.to_lowercase() == wanted);

        if let Some(category) = &found {
            if let Ok(mut cache) = self.category_cache.lock() {
                cache.insert(key, category.clone());
            }
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[test]
    fn test_discussion_deserializes_camel_case() {
        let json = r#"{
            "id": "D_kwDO",
            "number": 12,
            "title": "Marcus Aurelius",
            "body": "Roman Emperor",
            "url": "https://github.com/acme/wiki/discussions/12",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-06-01T12:30:00Z"
        }"#;

        let d: Discussion = serde_json::from_str(json).unwrap();
        assert_eq!(d.number, 12);
        assert_eq!(d.updated_at.to_rfc3339(), "2024-06-01T12:30:00+00:00");
    }

    #[tokio::test]
    async fn test_request_without_token_fails_lazily() {
        // Construction must succeed with no token; the failure happens on
        // the first request.
        let client = GithubClient::new(ClientConfig::new(None));
        let result = client.find_category("acme", "wiki", "People").await;
        assert!(matches!(result, Err(ApiError::AuthenticationMissing)));
    }

    #[test]
    fn test_category_cache_is_instance_scoped() {
        let client = GithubClient::new(ClientConfig::new(None));
        client
            .category_cache
            .lock()
            .unwrap()
            .insert(
                "acme/wiki#people".into(),
                DiscussionCategory {
                    id: "DIC_1".into(),
                    name: "People".into(),
                },
            );

        assert_eq!(client.category_cache.lock().unwrap().len(), 1);
        client.clear_category_cache();
        assert!(client.category_cache.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_category_serves_cached_hit_without_request() {
        // A cached entry must satisfy the lookup even though the client has
        // no token and could not make a request.
        let client = GithubClient::new(ClientConfig::new(None));
        client
            .category_cache
            .lock()
            .unwrap()
            .insert(
                "acme/wiki#people".into(),
                DiscussionCategory {
                    id: "DIC_1".into(),
                    name: "People".into(),
                },
            );

        let found = client.find_category("acme", "wiki", "PEOPLE").await.unwrap();
        assert_eq!(found.unwrap().id, "DIC_1");
    }
}
