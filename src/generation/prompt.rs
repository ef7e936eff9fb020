/// Marker the model is asked to put in front of the title line
pub const TITLE_MARKER: &str = "Title:";

/// Build the generation prompt for a topic.
///
/// The prompt asks for a `Title:` line followed by the article body so the
/// response can be split mechanically.
pub fn build_prompt(topic: &str) -> String {
    format!(
        "Write a professional blog article about {topic}.

The article should:
- Have an engaging title
- Be 400-600 words long
- Include an introduction, main points, and conclusion
- Be informative and well-structured
- Use a professional but accessible tone

Format:
{TITLE_MARKER} [Your Title Here]

[Article content here]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_deterministic_and_carries_marker() {
        let prompt = build_prompt("serverless computing");
        assert_eq!(prompt, build_prompt("serverless computing"));
        assert!(prompt.contains("about serverless computing."));
        assert!(prompt.lines().any(|line| line.starts_with(TITLE_MARKER)));
    }
}
