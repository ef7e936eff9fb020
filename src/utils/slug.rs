//! Slug and title normalization shared by the store and the generation client

use regex::Regex;
use std::sync::OnceLock;

use crate::models::DEFAULT_TOPIC;

/// Maximum stored title length, in characters
pub const MAX_TITLE_CHARS: usize = 100;

const TRUNCATION_MARKER: &str = "...";

fn non_alphanumeric_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static slug regex"))
}

/// Derive a URL-safe slug from free text.
///
/// Lowercases the input, collapses every run of characters outside `[a-z0-9]`
/// into one hyphen and trims hyphens from both ends. May return an empty string
/// when the input has no ASCII alphanumerics.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    non_alphanumeric_runs()
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Slug for an article: derived from the title, then the topic, then `article`
/// when neither yields any ASCII alphanumerics.
pub fn derive_slug(title: &str, topic: &str) -> String {
    [slugify(title), slugify(topic)]
        .into_iter()
        .find(|slug| !slug.is_empty())
        .unwrap_or_else(|| "article".to_string())
}

/// Normalized topic tag: slug form of the label, `general` when blank
pub fn normalize_topic(label: &str) -> String {
    let tag = slugify(label);
    if tag.is_empty() {
        DEFAULT_TOPIC.to_string()
    } else {
        tag
    }
}

/// True when `slug` is non-empty and already in canonical slug form
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slugify(slug) == slug
}

/// Cap a title at [`MAX_TITLE_CHARS`] characters.
///
/// Longer titles keep their first 97 characters followed by `...`, so the
/// result is exactly 100 characters.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.to_string();
    }

    let keep = MAX_TITLE_CHARS - TRUNCATION_MARKER.chars().count();
    let mut truncated: String = title.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// Uppercase the first character, leaving the rest untouched
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Cloud Computing 101"), "cloud-computing-101");
        assert_eq!(slugify("  --Hello,   World!--  "), "hello-world");
        assert_eq!(slugify("API design and REST principles"), "api-design-and-rest-principles");
        assert_eq!(slugify("C++ & Rust: a comparison"), "c-rust-a-comparison");
        assert_eq!(slugify("Café crème"), "caf-cr-me");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_derive_slug_falls_back() {
        assert_eq!(derive_slug("Rust Tips", "general"), "rust-tips");
        assert_eq!(derive_slug("日本語のタイトル", "serverless computing"), "serverless-computing");
        assert_eq!(derive_slug("日本語", "日本語"), "article");
    }

    #[test]
    fn test_normalize_topic() {
        assert_eq!(normalize_topic("Cloud computing and DevOps"), "cloud-computing-and-devops");
        assert_eq!(normalize_topic("   "), "general");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("cloud-computing-101"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Cloud-Computing"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("double--hyphen"));
    }

    #[test]
    fn test_truncate_title() {
        let short = "A short title";
        assert_eq!(truncate_title(short), short);

        let exact = "x".repeat(MAX_TITLE_CHARS);
        assert_eq!(truncate_title(&exact), exact);

        let long = "y".repeat(150);
        let truncated = truncate_title(&long);
        assert_eq!(truncated.chars().count(), MAX_TITLE_CHARS);
        assert!(truncated.ends_with("..."));
        assert!(truncated.starts_with(&"y".repeat(97)));
    }

    #[test]
    fn test_truncate_title_counts_characters_not_bytes() {
        let long = "é".repeat(120);
        let truncated = truncate_title(&long);
        assert_eq!(truncated.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("serverless computing"), "Serverless computing");
        assert_eq!(capitalize_first(""), "");
    }
}
