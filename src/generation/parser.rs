//! Response parsing for the generation client
//!
//! Upstream payloads are first reduced to a single text blob, whatever the
//! provider's response shape, and then split into title and content by one
//! canonical algorithm.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::errors::{GenerationError, GenerationResult};
use crate::models::GeneratedArticle;
use crate::utils::slug::{capitalize_first, derive_slug, normalize_topic, truncate_title};

const QUOTE_CHARS: &[char] = &['"', '\'', '“', '”', '‘', '’', '«', '»'];
const DECORATION_CHARS: &[char] = &['#', '*', '_', '>', '`'];

/// Matches a title marker line such as `Title: ...`, `**Title:** ...` or
/// `## title: ...`, capturing the text after the marker
fn title_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^[\s#*_>`]*title[\s*_`]*:[\s*_`]*(.*)$").expect("static marker regex")
    })
}

/// Title used when the upstream text is kept but could not be split
pub fn degenerate_title(topic: &str) -> String {
    format!("Exploring {}", capitalize_first(topic))
}

/// Reduce a provider payload to the generated text.
///
/// Accepts raw-completion shapes (`[{"generated_text": ..}]`,
/// `{"generated_text": ..}`), chat-completion shapes
/// (`{"choices": [{"message": {"content": ..}}]}`, `{"choices": [{"text": ..}]}`)
/// and a bare JSON string.
pub fn extract_text(payload: &Value) -> GenerationResult<String> {
    match payload {
        Value::String(text) => Ok(text.clone()),
        Value::Array(items) => match items.first() {
            Some(first) => extract_text(first),
            None => Err(GenerationError::EmptyResponse),
        },
        Value::Object(map) => {
            if let Some(text) = map.get("generated_text").and_then(Value::as_str) {
                return Ok(text.to_string());
            }

            if let Some(choice) = map
                .get("choices")
                .and_then(Value::as_array)
                .and_then(|choices| choices.first())
            {
                let text = choice
                    .pointer("/message/content")
                    .and_then(Value::as_str)
                    .or_else(|| choice.get("text").and_then(Value::as_str));
                return text.map(str::to_string).ok_or_else(|| {
                    GenerationError::malformed("choice carries neither message.content nor text")
                });
            }

            if let Some(error) = map.get("error") {
                let message = error
                    .as_str()
                    .map(str::to_string)
                    .or_else(|| error.get("message").and_then(Value::as_str).map(str::to_string))
                    .unwrap_or_else(|| error.to_string());
                return Err(GenerationError::malformed(format!(
                    "provider returned an error: {message}"
                )));
            }

            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            Err(GenerationError::malformed(format!(
                "unrecognised response object with keys [{}]",
                keys.join(", ")
            )))
        }
        Value::Null => Err(GenerationError::EmptyResponse),
        other => Err(GenerationError::malformed(format!(
            "unexpected JSON value: {other}"
        ))),
    }
}

/// Split generated text into an article.
///
/// `topic` is the catalog label the prompt was built from. Empty text and text
/// shorter than `min_content_length` are errors, which the client turns into a
/// fallback article. Text that parses but leaves a body below the threshold is
/// kept whole under a generic title.
pub fn parse_generated_text(
    text: &str,
    topic: &str,
    min_content_length: usize,
) -> GenerationResult<GeneratedArticle> {
    let full_text = text.trim();
    if full_text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let length = full_text.chars().count();
    if length < min_content_length {
        return Err(GenerationError::TooShort {
            length,
            minimum: min_content_length,
        });
    }

    let lines: Vec<&str> = full_text.lines().collect();
    let marker = title_marker();

    let (raw_title, body_lines) = match lines
        .iter()
        .enumerate()
        .find_map(|(index, line)| marker.captures(line).map(|caps| (index, caps)))
    {
        Some((index, caps)) => {
            let title = caps.get(1).map_or("", |m| m.as_str());
            (title.to_string(), &lines[index + 1..])
        }
        None => {
            // The text is non-empty, so at least one non-blank line exists
            let first = lines
                .iter()
                .position(|line| !line.trim().is_empty())
                .unwrap_or(0);
            (lines[first].to_string(), &lines[first + 1..])
        }
    };

    let content = join_paragraphs(body_lines);
    let mut title = truncate_title(&clean_title(&raw_title));
    let mut content = content;

    if title.is_empty() || content.chars().count() < min_content_length {
        title = degenerate_title(topic);
        content = full_text.to_string();
    }

    Ok(GeneratedArticle {
        slug: derive_slug(&title, topic),
        title,
        content,
        topic: normalize_topic(topic),
    })
}

/// Non-blank lines, trimmed, separated by one blank line
fn join_paragraphs(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Strip markdown decoration, residual markers and wrapping quotes
fn clean_title(raw: &str) -> String {
    let mut title = raw.trim().to_string();

    while let Some(rest) = title_marker()
        .captures(&title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
    {
        title = rest;
    }

    title
        .trim()
        .trim_matches(|c: char| DECORATION_CHARS.contains(&c) || c.is_whitespace())
        .trim_matches(|c: char| QUOTE_CHARS.contains(&c) || c.is_whitespace())
        .trim()
        .to_string()
}
