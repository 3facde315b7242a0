use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use deepchat_core::{split_thinking, Exchange, ModelInfo, Usage};
use std::io::{self, Write};

use crate::theme::Theme;

/// Write `text` as a bold heading in `color`, followed by a newline.
fn heading<W: Write>(out: &mut W, theme: &Theme, color: Color, text: &str) -> io::Result<()> {
    if theme.styled {
        queue!(
            out,
            SetForegroundColor(color),
            SetAttribute(Attribute::Bold),
            Print(text),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Print("\n")
        )
    } else {
        writeln!(out, "{text}")
    }
}

pub fn banner<W: Write>(out: &mut W, theme: &Theme) -> io::Result<()> {
    heading(out, theme, theme.accent, "\n=== DeepSeek AI Interactive Mode ===")?;
    writeln!(out, "Type 'exit' to quit, 'clear' to clear screen, '/help' for commands")?;
    out.flush()
}

pub fn model_info<W: Write>(out: &mut W, theme: &Theme, info: &ModelInfo) -> io::Result<()> {
    heading(out, theme, theme.accent, "\nModel Information:")?;
    writeln!(out, "Name: {}", info.model_name)?;
    writeln!(out, "Type: {}", info.model_type)?;
    writeln!(out, "Provider: {}", info.model_provider_name)?;
    out.flush()
}

/// Live echo of one streamed fragment.
pub fn fragment<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    write!(out, "{text}")?;
    out.flush()
}

/// The response broken into its thinking and answer sections.
pub fn response<W: Write>(out: &mut W, theme: &Theme, raw: &str) -> io::Result<()> {
    let parts = split_thinking(raw);

    heading(out, theme, theme.accent, "\nResponse:")?;
    if let Some(thinking) = parts.thinking {
        heading(out, theme, theme.thinking, "\nThinking Process:")?;
        writeln!(out, "{}", thinking.trim())?;
    }
    heading(out, theme, theme.answer, "\nAnswer:")?;
    writeln!(out, "{}", parts.answer.trim())?;
    out.flush()
}

pub fn usage<W: Write>(out: &mut W, theme: &Theme, usage: Option<&Usage>) -> io::Result<()> {
    heading(out, theme, theme.muted, "\nUsage Statistics:")?;
    match usage {
        Some(u) => {
            writeln!(out, "\tPrompt tokens: {}", u.prompt_tokens)?;
            writeln!(out, "\tCompletion tokens: {}", u.completion_tokens)?;
            writeln!(out, "\tTotal tokens: {}", u.total_tokens)?;
        }
        None => writeln!(out, "\tNot available in streaming response")?,
    }
    out.flush()
}

pub fn exchange<W: Write>(out: &mut W, theme: &Theme, exchange: &Exchange) -> io::Result<()> {
    heading(out, theme, theme.accent, "\nQuestion:")?;
    writeln!(out, "{}", exchange.question)?;
    response(out, theme, &exchange.response)
}

pub fn message<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    writeln!(out, "{text}")?;
    out.flush()
}

/// A failed turn, in the theme's error color.
pub fn error<W: Write>(out: &mut W, theme: &Theme, text: &str) -> io::Result<()> {
    heading(out, theme, theme.error, &format!("\nError: {text}"))?;
    out.flush()
}

pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_response_with_thinking() {
        let text = rendered(|out| {
            response(out, &Theme::plain(), "<think>\n  carry the one \n</think>\n\nFour.")
        });
        assert!(text.contains("Thinking Process:\ncarry the one\n"));
        assert!(text.contains("Answer:\nFour.\n"));
    }

    #[test]
    fn test_response_without_thinking() {
        let text = rendered(|out| response(out, &Theme::plain(), "  Just four.  "));
        assert!(!text.contains("Thinking"));
        assert!(text.contains("Answer:\nJust four.\n"));
    }

    #[test]
    fn test_usage_missing() {
        let text = rendered(|out| usage(out, &Theme::plain(), None));
        assert!(text.contains("Not available in streaming response"));
    }

    #[test]
    fn test_usage_present() {
        let counters = Usage {
            prompt_tokens: 1,
            completion_tokens: 2,
            total_tokens: 3,
        };
        let text = rendered(|out| usage(out, &Theme::plain(), Some(&counters)));
        assert!(text.contains("\tPrompt tokens: 1\n"));
        assert!(text.contains("\tCompletion tokens: 2\n"));
        assert!(text.contains("\tTotal tokens: 3\n"));
    }

    #[test]
    fn test_styled_heading_emits_escapes() {
        let text = rendered(|out| banner(out, &Theme::dark()));
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("Interactive Mode"));
    }

    #[test]
    fn test_error_uses_theme_color() {
        let plain = rendered(|out| error(out, &Theme::plain(), "timed out"));
        assert_eq!(plain, "\nError: timed out\n");

        let dark = Theme::dark();
        let styled = rendered(|out| error(out, &dark, "timed out"));
        let mut expected_color = Vec::new();
        queue!(expected_color, SetForegroundColor(dark.error)).unwrap();
        assert!(styled.contains(std::str::from_utf8(&expected_color).unwrap()));
        assert!(styled.contains("Error: timed out"));
    }
}
