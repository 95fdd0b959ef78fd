//! Rule-based intent detection for chat messages.
//!
//! Plain lower-cased substring checks over a fixed vocabulary; no tokenizing,
//! no word boundaries. A message naming several topics resolves to whichever
//! appears first in the vocabulary, not whichever is most prominent.

use crate::domain::{ClassificationResult, Intent};

const LEARNING_WORDS: &[&str] = &["learn", "teach", "study", "course"];

/// Prefix test, not substring: "what", "how", ... must open the message.
const QUESTION_PREFIXES: &[&str] = &["what", "how", "why", "when", "where", "can", "could", "explain"];

#[derive(Clone, Debug)]
pub struct IntentClassifier {
    vocabulary: Vec<String>,
}

impl IntentClassifier {
    /// `vocabulary` order is the tie-break when several topics match.
    pub fn new(vocabulary: Vec<String>) -> Self {
        let vocabulary = vocabulary.into_iter().map(|t| t.to_lowercase()).collect();
        Self { vocabulary }
    }

    /// Classify a message. Total over all inputs; the empty string is
    /// general conversation.
    pub fn detect(&self, message: &str) -> ClassificationResult {
        let lower = message.trim().to_lowercase();

        if LEARNING_WORDS.iter().any(|w| lower.contains(w)) {
            return match self.first_topic(&lower) {
                Some(topic) => result(Intent::Learning, Some(topic), 0.9),
                None => result(Intent::Learning, None, 0.7),
            };
        }

        if QUESTION_PREFIXES.iter().any(|p| lower.starts_with(p)) {
            return match self.first_topic(&lower) {
                Some(topic) => result(Intent::Question, Some(topic), 0.85),
                None => result(Intent::Question, None, 0.8),
            };
        }

        if let Some(topic) = self.first_topic(&lower) {
            return result(Intent::TopicExploration, Some(topic), 0.7);
        }

        result(Intent::GeneralConversation, None, 0.5)
    }

    fn first_topic(&self, lower: &str) -> Option<String> {
        self.vocabulary.iter().find(|t| lower.contains(t.as_str())).cloned()
    }
}

fn result(intent: Intent, topic: Option<String>, confidence: f32) -> ClassificationResult {
    ClassificationResult { intent, topic, confidence }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::topic_vocabulary;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(topic_vocabulary())
    }

    #[test]
    fn learning_word_with_topic() {
        let c = classifier();
        for (msg, topic) in [
            ("I want to learn python", "python"),
            ("Teach me web development please", "web development"),
            ("Let's study cybersecurity tonight", "cybersecurity"),
            ("Is there a course on communication?", "communication"),
        ] {
            let r = c.detect(msg);
            assert_eq!(r.intent, Intent::Learning, "{msg}");
            assert_eq!(r.topic.as_deref(), Some(topic), "{msg}");
            assert_eq!(r.confidence, 0.9);
        }
    }

    #[test]
    fn learning_word_without_topic() {
        let r = classifier().detect("I want to learn something new");
        assert_eq!(r, ClassificationResult { intent: Intent::Learning, topic: None, confidence: 0.7 });
    }

    #[test]
    fn question_prefix_is_a_prefix_test() {
        let c = classifier();
        let r = c.detect("How do closures work in javascript?");
        assert_eq!(r.intent, Intent::Question);
        assert_eq!(r.topic.as_deref(), Some("javascript"));
        assert_eq!(r.confidence, 0.85);

        let r = c.detect("Why is the sky blue?");
        assert_eq!(r, ClassificationResult { intent: Intent::Question, topic: None, confidence: 0.8 });

        // "how" in the middle does not make it a question.
        let r = c.detect("tell me how sql joins work");
        assert_eq!(r.intent, Intent::TopicExploration);
        assert_eq!(r.topic.as_deref(), Some("sql"));
    }

    #[test]
    fn bare_topic_mention() {
        let r = classifier().detect("react hooks are neat");
        assert_eq!(r, ClassificationResult { intent: Intent::TopicExploration, topic: Some("react".into()), confidence: 0.7 });
    }

    #[test]
    fn nothing_recognized_is_general_conversation() {
        let c = classifier();
        for msg in ["", "   ", "hello there", "good morning!"] {
            assert_eq!(
                c.detect(msg),
                ClassificationResult { intent: Intent::GeneralConversation, topic: None, confidence: 0.5 },
                "{msg:?}"
            );
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let r = classifier().detect("WHAT IS PYTHON");
        assert_eq!(r.intent, Intent::Question);
        assert_eq!(r.topic.as_deref(), Some("python"));
    }

    #[test]
    fn learning_beats_question_prefix() {
        let r = classifier().detect("how can I learn data science");
        assert_eq!(r.intent, Intent::Learning);
        assert_eq!(r.topic.as_deref(), Some("data science"));
    }

    #[test]
    fn vocabulary_order_breaks_ties() {
        let c = classifier();
        // "python" precedes "sql" in the vocabulary.
        assert_eq!(c.detect("sql and python").topic.as_deref(), Some("python"));
        // "machine learning" itself contains "learn".
        let r = c.detect("machine learning vs deep learning");
        assert_eq!(r.intent, Intent::Learning);
        assert_eq!(r.topic.as_deref(), Some("machine learning"));
        // Substring overlap: "explain" contains "ai", which precedes "sql".
        assert_eq!(c.detect("explain sql").topic.as_deref(), Some("ai"));

        let reordered = IntentClassifier::new(vec!["sql".into(), "python".into()]);
        assert_eq!(reordered.detect("sql and python").topic.as_deref(), Some("sql"));
    }

    #[test]
    fn repeated_calls_agree() {
        let c = classifier();
        let msg = "Could you explain deep learning?";
        assert_eq!(c.detect(msg), c.detect(msg));
    }
}
