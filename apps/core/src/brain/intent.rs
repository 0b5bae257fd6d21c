//! Question-intent detection using regex patterns.
//!
//! Decides whether a message is an informational question ("what is
//! diabetes") as opposed to a symptom description. Pure regex matching, no
//! ML model.

use regex::Regex;
use std::sync::LazyLock;

// Compiled once at startup. A broken pattern is a programming error, so
// expect() is acceptable here.
static QUESTION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(what is|what's|what are|how does|tell me about|define|explain)\b")
        .expect("Invalid regex: question prefix pattern")
});

/// Extract the topic of an informational question.
///
/// Matches a fixed set of leading phrases against the lowercased, trimmed
/// message. On a match, the phrase and any trailing punctuation are stripped
/// and the remaining topic is returned. `None` means the message does not
/// look like a question (or the question carries no topic at all) and should
/// be treated as a possible symptom description instead.
pub fn question_topic(message: &str) -> Option<String> {
    let text = message.to_lowercase();
    let text = text.trim();

    let matched = QUESTION_PREFIX.find(text)?;
    let topic = text[matched.end()..]
        .trim_matches(|c: char| c == '?' || c == '.' || c == '!' || c.is_whitespace());

    if topic.is_empty() {
        return None;
    }
    Some(topic.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_phrases_are_detected() {
        let cases = [
            ("what is diabetes", "diabetes"),
            ("What's malaria?", "malaria"),
            ("what are hives", "hives"),
            ("How does asthma work", "asthma work"),
            ("tell me about jaundice.", "jaundice"),
            ("define anemia", "anemia"),
            ("Explain typhoid?!", "typhoid"),
        ];

        for (message, expected) in cases {
            assert_eq!(
                question_topic(message).as_deref(),
                Some(expected),
                "for '{}'",
                message
            );
        }
    }

    #[test]
    fn test_symptom_descriptions_are_not_questions() {
        for message in [
            "I have a headache and mild fever",
            "my stomach hurts",
            "feeling dizzy since morning",
            "",
        ] {
            assert_eq!(question_topic(message), None, "for '{}'", message);
        }
    }

    #[test]
    fn test_prefix_must_lead_the_message() {
        // "what is" in the middle of a sentence is not a question intent.
        assert_eq!(question_topic("I wonder what is wrong with me"), None);
    }

    #[test]
    fn test_empty_topic_yields_none() {
        assert_eq!(question_topic("what is"), None);
        assert_eq!(question_topic("explain ???"), None);
    }
}
