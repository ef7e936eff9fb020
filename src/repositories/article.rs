//! JSON file backed article store
//!
//! The whole collection lives in one JSON array. Every mutation reads the
//! file, modifies the collection in memory and rewrites the file through a
//! temporary sibling that is renamed into place. Mutations inside one process
//! are serialized by `write_lock`; separate processes writing the same file can
//! still lose updates, so only one writer process may run at a time.

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::traits::ArticleStore;
use crate::errors::{StoreError, StoreResult};
use crate::models::{Article, ArticleId, NewArticle, DEFAULT_TOPIC};
use crate::utils::slug::{derive_slug, is_valid_slug, normalize_topic, truncate_title};

pub struct JsonArticleStore {
    path: PathBuf,
    /// Guards read-modify-write cycles; holds the last id handed out
    write_lock: Mutex<ArticleId>,
}

/// Candidate after trimming, truncation and slug checks
#[derive(Debug, PartialEq, Eq)]
struct PreparedArticle {
    title: String,
    content: String,
    explicit_slug: Option<String>,
    topic: String,
}

impl JsonArticleStore {
    /// Open the store, creating the parent directory and an empty collection
    /// file if they do not exist yet
    pub async fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        match tokio::fs::metadata(&path).await {
            Ok(_) => debug!("Using existing article store at {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tokio::fs::write(&path, "[]")
                    .await
                    .map_err(|e| StoreError::io(&path, e))?;
                info!("Article store initialized at {}", path.display());
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> StoreResult<Vec<Article>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn write_all(&self, articles: &[Article]) -> StoreResult<()> {
        let contents = serde_json::to_string_pretty(articles)?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        tokio::fs::write(&tmp_path, contents)
            .await
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}

#[async_trait]
impl ArticleStore for JsonArticleStore {
    async fn create(&self, candidate: NewArticle) -> StoreResult<Article> {
        let prepared = prepare_candidate(candidate)?;

        let mut last_id = self.write_lock.lock().await;
        let mut articles = self.read_all().await?;

        let taken: HashSet<&str> = articles.iter().map(|a| a.slug.as_str()).collect();
        let slug = match prepared.explicit_slug {
            Some(slug) if taken.contains(slug.as_str()) => {
                return Err(StoreError::duplicate_slug(slug));
            }
            Some(slug) => slug,
            None => unique_slug(&derive_slug(&prepared.title, &prepared.topic), &taken),
        };

        let created_at = Utc::now();
        let stored_max = articles.iter().map(|a| a.id).max().unwrap_or(0);
        let id = next_id(created_at.timestamp_micros(), stored_max.max(*last_id));

        let article = Article {
            id,
            slug,
            title: prepared.title,
            content: prepared.content,
            topic: prepared.topic,
            created_at,
        };

        articles.push(article.clone());
        self.write_all(&articles).await?;
        *last_id = id;

        info!("Article created: {} ({})", article.title, article.slug);
        Ok(article)
    }

    async fn get_by_id(&self, id: ArticleId) -> StoreResult<Option<Article>> {
        let articles = self.read_all().await?;
        Ok(articles.into_iter().find(|a| a.id == id))
    }

    async fn get_by_slug(&self, slug: &str) -> StoreResult<Option<Article>> {
        let articles = self.read_all().await?;
        Ok(articles.into_iter().find(|a| a.slug == slug))
    }

    async fn list_all(&self) -> Vec<Article> {
        match self.read_all().await {
            Ok(mut articles) => {
                sort_newest_first(&mut articles);
                articles
            }
            Err(e) => {
                error!("Error reading article store: {}", e);
                Vec::new()
            }
        }
    }

    async fn delete(&self, id: ArticleId) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut articles = self.read_all().await?;

        let before = articles.len();
        articles.retain(|a| a.id != id);
        if articles.len() == before {
            debug!("Delete requested for unknown article id {}", id);
            return Ok(false);
        }

        self.write_all(&articles).await?;
        info!("Article deleted: {}", id);
        Ok(true)
    }
}

/// Order by `created_at` descending, ties broken by `id` descending
pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(newest_first);
}

fn newest_first(a: &Article, b: &Article) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Next id: the insertion time in microseconds, bumped past anything issued
fn next_id(now_micros: i64, highest_issued: ArticleId) -> ArticleId {
    let clock = u64::try_from(now_micros).unwrap_or(0);
    clock.max(highest_issued + 1)
}

/// `base`, or `base-2`, `base-3`, ... whichever is free first
fn unique_slug(base: &str, taken: &HashSet<&str>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }

    (2u64..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}

fn prepare_candidate(candidate: NewArticle) -> StoreResult<PreparedArticle> {
    let title = candidate.title.trim();
    if title.is_empty() {
        return Err(StoreError::validation("title", "must not be empty"));
    }

    let content = candidate.content.trim();
    if content.is_empty() {
        return Err(StoreError::validation("content", "must not be empty"));
    }

    let explicit_slug = match candidate.slug {
        Some(slug) => {
            let slug = slug.trim().to_string();
            if !is_valid_slug(&slug) {
                return Err(StoreError::validation(
                    "slug",
                    format!("'{slug}' is not a valid slug (lowercase a-z, 0-9 and single hyphens)"),
                ));
            }
            Some(slug)
        }
        None => None,
    };

    let topic = candidate
        .topic
        .as_deref()
        .map(normalize_topic)
        .unwrap_or_else(|| DEFAULT_TOPIC.to_string());

    Ok(PreparedArticle {
        title: truncate_title(title),
        content: content.to_string(),
        explicit_slug,
        topic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn article(id: ArticleId, secs: i64) -> Article {
        Article {
            id,
            slug: format!("a-{id}"),
            title: format!("A {id}"),
            content: "Body".to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_sort_newest_first_with_tiebreak() {
        let mut articles = vec![article(1, 100), article(3, 300), article(2, 300), article(4, 200)];
        sort_newest_first(&mut articles);

        let ids: Vec<ArticleId> = articles.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_next_id_is_monotonic() {
        assert_eq!(next_id(1_000, 0), 1_000);
        assert_eq!(next_id(1_000, 1_000), 1_001);
        assert_eq!(next_id(500, 1_000), 1_001);
        assert_eq!(next_id(-5, 0), 1);
    }

    #[test]
    fn test_unique_slug() {
        let taken: HashSet<&str> = ["rust", "rust-2", "go"].into_iter().collect();
        assert_eq!(unique_slug("rust", &taken), "rust-3");
        assert_eq!(unique_slug("go", &taken), "go-2");
        assert_eq!(unique_slug("zig", &taken), "zig");
    }

    #[test]
    fn test_prepare_candidate() {
        let prepared = prepare_candidate(
            NewArticle::new("  Hello  ", "  Body text \n").with_topic("Cloud Computing"),
        )
        .unwrap();

        assert_eq!(prepared.title, "Hello");
        assert_eq!(prepared.content, "Body text");
        assert_eq!(prepared.topic, "cloud-computing");
        assert_eq!(prepared.explicit_slug, None);

        let defaulted = prepare_candidate(NewArticle::new("T", "C")).unwrap();
        assert_eq!(defaulted.topic, DEFAULT_TOPIC);
    }

    #[test]
    fn test_prepare_candidate_rejects_invalid_input() {
        let empty_title = prepare_candidate(NewArticle::new("   ", "Body"));
        assert!(matches!(empty_title, Err(StoreError::Validation { ref field, .. }) if field == "title"));

        let empty_content = prepare_candidate(NewArticle::new("Title", "\n\t"));
        assert!(matches!(empty_content, Err(StoreError::Validation { ref field, .. }) if field == "content"));

        let bad_slug = prepare_candidate(NewArticle::new("Title", "Body").with_slug("Not A Slug"));
        assert!(matches!(bad_slug, Err(StoreError::Validation { ref field, .. }) if field == "slug"));
    }
}
