use crate::constants::history::QUESTION_LABEL;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// DeepSeek-R1 takes no system prompt: every instruction rides in the user
// turn, and the leading `<think>` forces a reasoning phase.

const GENERAL: &str = "<think>\n\
Instructions:\n\
- Adapt response style to match question complexity\n\
- Use simple language for casual questions\n\
- Provide detailed analysis for complex topics\n\
- Include relevant examples when helpful\n\
- Express confidence levels when uncertain\n\
- Maintain factual accuracy\n\
- Use analogies for complex concepts\n\
- Format responses for readability\n\n\
Role: Knowledgeable assistant with expertise across multiple domains\n\
Task parameters:\n\
- Style: Natural and adaptive\n\
- Depth: Matches question complexity\n\
- Format: Clear and readable\n\
- Tone: Friendly yet professional\n\
- Language: Simple and accessible\n\n";

const CODING: &str = "<think>\n\
Instructions:\n\
- Provide production-ready code examples\n\
- Include error handling and edge cases\n\
- Show design patterns and best practices\n\
- Explain time/space complexity\n\
- Include unit test examples\n\
- Reference language-specific documentation\n\
- Highlight potential security concerns\n\
- Show performance optimization tips\n\n\
Role: Expert Software Architect specializing in system design and optimization\n\
Task parameters:\n\
- Code quality: Production-ready\n\
- Documentation: Comprehensive\n\
- Standards: Industry best practices\n\
- Security: OWASP compliance\n\n";

/// The fixed instructional text sent at the head of every request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptTemplate {
    #[default]
    General,
    Coding,
}

impl PromptTemplate {
    pub fn all() -> &'static [PromptTemplate] {
        &[Self::General, Self::Coding]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Coding => "coding",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::General => GENERAL,
            Self::Coding => CODING,
        }
    }

    /// The full prompt for one question: template, label, question.
    pub fn render(&self, question: &str) -> String {
        format!("{}{} {}\n", self.text(), QUESTION_LABEL, question.trim())
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PromptTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(Self::General),
            "coding" | "code" => Ok(Self::Coding),
            other => Err(format!(
                "unknown template '{other}' (expected one of: general, coding)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::extract_question;

    #[test]
    fn test_templates_open_with_think_tag() {
        for template in PromptTemplate::all() {
            assert!(template.text().starts_with("<think>\n"));
            assert!(!template.text().contains(QUESTION_LABEL));
        }
    }

    #[test]
    fn test_render_round_trips_through_extract_question() {
        let prompt = PromptTemplate::Coding.render("  How do I reverse a Vec?  ");
        assert!(prompt.starts_with(PromptTemplate::Coding.text()));
        assert_eq!(extract_question(&prompt), "How do I reverse a Vec?");
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("general".parse::<PromptTemplate>(), Ok(PromptTemplate::General));
        assert_eq!("Coding".parse::<PromptTemplate>(), Ok(PromptTemplate::Coding));
        assert!("poetry".parse::<PromptTemplate>().is_err());
    }
}
