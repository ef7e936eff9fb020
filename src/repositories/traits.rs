//! Content store trait
//!
//! The job runner and the CLI depend on this trait rather than on a concrete
//! store, so tests can substitute fakes.

use async_trait::async_trait;

use crate::errors::StoreResult;
use crate::models::{Article, ArticleId, NewArticle};

/// Durable article collection
///
/// # Invariants
///
/// * ids are unique for the store's lifetime and never reused
/// * slugs are unique among stored articles
/// * [`ArticleStore::list_all`] is ordered by `created_at` descending, ties
///   broken by `id` descending
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Validate and persist a candidate
    ///
    /// # Returns
    ///
    /// * `Ok(Article)` - Stored article with assigned id, slug and timestamp
    /// * `Err(StoreError::Validation | StoreError::DuplicateSlug)` - Bad candidate
    /// * `Err(StoreError::Io | StoreError::Corrupt)` - Storage unavailable
    async fn create(&self, candidate: NewArticle) -> StoreResult<Article>;

    /// Find an article by id
    async fn get_by_id(&self, id: ArticleId) -> StoreResult<Option<Article>>;

    /// Find an article by slug
    async fn get_by_slug(&self, slug: &str) -> StoreResult<Option<Article>>;

    /// All articles, newest first. Never fails: storage faults are logged and
    /// yield an empty list.
    async fn list_all(&self) -> Vec<Article>;

    /// Delete an article by id
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Article removed
    /// * `Ok(false)` - No such article; nothing was written
    async fn delete(&self, id: ArticleId) -> StoreResult<bool>;

    /// Number of stored articles, with the same degradation as `list_all`
    async fn count(&self) -> usize {
        self.list_all().await.len()
    }
}
