use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Topic tag used when a candidate does not carry one
pub const DEFAULT_TOPIC: &str = "general";

pub type ArticleId = u64;

/// A stored article. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub topic: String,
    pub created_at: DateTime<Utc>,
}

/// Candidate passed to the store's create operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    /// Explicit slug. Rejected on collision; `None` derives one from the title.
    pub slug: Option<String>,
    pub topic: Option<String>,
}

/// Output of one generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArticle {
    pub title: String,
    pub content: String,
    pub slug: String,
    pub topic: String,
}

impl NewArticle {
    pub fn new<T: Into<String>, C: Into<String>>(title: T, content: C) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            slug: None,
            topic: None,
        }
    }

    pub fn with_slug<S: Into<String>>(mut self, slug: S) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_topic<S: Into<String>>(mut self, topic: S) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

impl From<GeneratedArticle> for NewArticle {
    /// The generated slug is derived from the title with the store's own rule,
    /// so it is left for the store to re-derive and disambiguate.
    fn from(generated: GeneratedArticle) -> Self {
        Self {
            title: generated.title,
            content: generated.content,
            slug: None,
            topic: Some(generated.topic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_article_serializes_camel_case() {
        let article = Article {
            id: 42,
            slug: "hello-world".to_string(),
            title: "Hello World".to_string(),
            content: "Body".to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        };

        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["createdAt"], "2024-01-02T03:04:05Z");
        assert!(json.get("created_at").is_none());

        let back: Article = serde_json::from_value(json).unwrap();
        assert_eq!(back, article);
    }

    #[test]
    fn test_generated_article_drops_slug_when_converted() {
        let generated = GeneratedArticle {
            title: "Rust in Production".to_string(),
            content: "Para".to_string(),
            slug: "rust-in-production".to_string(),
            topic: "backend-technologies-overview".to_string(),
        };

        let candidate = NewArticle::from(generated);
        assert_eq!(candidate.slug, None);
        assert_eq!(
            candidate.topic.as_deref(),
            Some("backend-technologies-overview")
        );
    }
}
