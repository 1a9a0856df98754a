use serde::{Deserialize, Serialize};

/// A single survey prompt.
///
/// Questions are static data supplied when the process starts and never change
/// for the lifetime of a session. The `id` is the key under which the answer is
/// stored in the [`AnswerSet`](super::AnswerSet).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub kind: QuestionKind,
    pub question_text: String,
    /// Ordered choices for select questions. Empty for free-text questions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
}

impl Question {
    /// Whether `value` is one of this question's option values.
    ///
    /// Always true for free-text questions.
    pub fn accepts(&self, value: &str) -> bool {
        if !self.kind.is_select() {
            return true;
        }
        self.options.iter().any(|o| o.value == value)
    }

    /// Looks up an option by its 1-based position, as shown to the respondent.
    pub fn option_at(&self, position: usize) -> Option<&QuestionOption> {
        position.checked_sub(1).and_then(|i| self.options.get(i))
    }
}

/// How a question is answered.
///
/// - `VibeChoice`: Single select rendered with emoji icons
/// - `IconChoice`: Single select rendered with named icons
/// - `Text`: Free-text answer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuestionKind {
    #[serde(rename = "mc-vibe")]
    VibeChoice,
    #[serde(rename = "mc-icon")]
    IconChoice,
    #[serde(rename = "text")]
    Text,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VibeChoice => "mc-vibe",
            Self::IconChoice => "mc-icon",
            Self::Text => "text",
        }
    }

    pub fn is_select(&self) -> bool {
        matches!(self, Self::VibeChoice | Self::IconChoice)
    }
}

/// One choice of a select question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionOption {
    /// The value stored in the answer set when this option is picked.
    pub value: String,
    pub label: String,
    /// Emoji for `mc-vibe` questions, icon name for `mc-icon` questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl QuestionOption {
    pub fn new(value: &str, label: &str, icon: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            icon: Some(icon.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select_question() -> Question {
        Question {
            id: "q1".to_string(),
            kind: QuestionKind::VibeChoice,
            question_text: "Pick one".to_string(),
            options: vec![
                QuestionOption::new("chill", "Chill", "🎧"),
                QuestionOption::new("chaotic", "Chaotic", "🎶"),
            ],
        }
    }

    #[test]
    fn kind_serializes_with_wire_names() {
        let json = serde_json::to_string(&QuestionKind::IconChoice).unwrap();
        assert_eq!(json, "\"mc-icon\"");

        let kind: QuestionKind = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(kind, QuestionKind::Text);
    }

    #[test]
    fn select_question_accepts_only_option_values() {
        let q = select_question();
        assert!(q.accepts("chill"));
        assert!(!q.accepts("Chill"));
    }

    #[test]
    fn text_question_accepts_anything() {
        let q = Question {
            id: "q2".to_string(),
            kind: QuestionKind::Text,
            question_text: "Say something".to_string(),
            options: vec![],
        };
        assert!(q.accepts("anything at all"));
    }

    #[test]
    fn option_at_is_one_based() {
        let q = select_question();
        assert_eq!(q.option_at(1).map(|o| o.value.as_str()), Some("chill"));
        assert_eq!(q.option_at(2).map(|o| o.value.as_str()), Some("chaotic"));
        assert!(q.option_at(0).is_none());
        assert!(q.option_at(3).is_none());
    }

    #[test]
    fn text_question_omits_options_when_serialized() {
        let q = Question {
            id: "q2".to_string(),
            kind: QuestionKind::Text,
            question_text: "Say something".to_string(),
            options: vec![],
        };
        let json = serde_json::to_value(&q).unwrap();
        assert!(json.get("options").is_none());
    }
}
