use crate::constants::markup::{THINK_CLOSE, THINK_OPEN};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref THINKING_RE: Regex = Regex::new(&format!(
        r"(?s)\A{}(.*?){}(.*)\z",
        regex::escape(THINK_OPEN),
        regex::escape(THINK_CLOSE)
    ))
    .expect("thinking pattern is valid");
}

/// A response split for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseParts<'a> {
    pub thinking: Option<&'a str>,
    pub answer: &'a str,
}

/// Split a raw response into its `<think>...</think>` segment and the answer.
///
/// Only a segment that opens the text and is closed counts. Anything else,
/// including a lone closing tag, leaves the whole text as the answer.
pub fn split_thinking(response: &str) -> ResponseParts<'_> {
    match THINKING_RE.captures(response) {
        Some(caps) => ResponseParts {
            thinking: caps.get(1).map(|m| m.as_str()),
            answer: caps.get(2).map_or("", |m| m.as_str()),
        },
        None => ResponseParts {
            thinking: None,
            answer: response,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_with_thinking() {
        let parts = split_thinking("<think>\nadd them\n</think>\n\nThe answer is 4.");
        assert_eq!(parts.thinking, Some("\nadd them\n"));
        assert_eq!(parts.answer, "\n\nThe answer is 4.");
    }

    #[test]
    fn test_split_without_thinking() {
        let parts = split_thinking("Just 4.");
        assert_eq!(parts.thinking, None);
        assert_eq!(parts.answer, "Just 4.");
    }

    #[test]
    fn test_unclosed_or_late_tags_are_answer() {
        assert_eq!(split_thinking("<think>never closed").thinking, None);
        assert_eq!(split_thinking("lead <think>x</think> tail").thinking, None);
        assert_eq!(split_thinking("reasoning</think>answer").thinking, None);
    }

    #[test]
    fn test_first_closing_tag_ends_thinking() {
        let parts = split_thinking("<think>a</think>b</think>c");
        assert_eq!(parts.thinking, Some("a"));
        assert_eq!(parts.answer, "b</think>c");
    }
}
