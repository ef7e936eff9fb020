//! Locally synthesized article used when the upstream call fails

use crate::models::GeneratedArticle;
use crate::utils::slug::{capitalize_first, derive_slug, normalize_topic};

/// Title used for fallback articles
pub fn fallback_title(topic: &str) -> String {
    format!("Introduction to {}", capitalize_first(topic))
}

/// Build the fallback article for a topic. Deterministic per topic.
pub fn fallback_article(topic: &str) -> GeneratedArticle {
    let title = fallback_title(topic);
    let content = format!(
        "This is an auto-generated article about {topic}.\n\n\
         {capitalized} is an important topic in modern technology. It encompasses various aspects \
         that developers and engineers need to understand.\n\n\
         In this article, we explore the fundamentals and provide insights into best practices \
         and current trends in the field.\n\n\
         Whether you're a beginner or an experienced professional, understanding {topic} is \
         crucial for staying current in the tech industry.",
        capitalized = capitalize_first(topic),
    );

    GeneratedArticle {
        slug: derive_slug(&title, topic),
        title,
        content,
        topic: normalize_topic(topic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_article_shape() {
        let article = fallback_article("cloud computing and DevOps");

        assert_eq!(article.title, "Introduction to Cloud computing and DevOps");
        assert_eq!(article.slug, "introduction-to-cloud-computing-and-devops");
        assert_eq!(article.topic, "cloud-computing-and-devops");
        assert_eq!(article.content.split("\n\n").count(), 4);
        assert!(article.content.contains("cloud computing and DevOps"));
        assert_eq!(article, fallback_article("cloud computing and DevOps"));
    }
}
