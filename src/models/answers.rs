use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Accumulated answers for one pass through the survey, keyed by question id.
///
/// A question counts as answered only when its key is present and the value is
/// not the empty string. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` for `question_id`, replacing any previous value.
    pub fn record(&mut self, question_id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(question_id.into(), value.into());
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.get(question_id).is_some_and(|v| !v.is_empty())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_twice_keeps_latest_value() {
        let mut answers = AnswerSet::new();
        answers.record("q1", "a");
        answers.record("q1", "b");

        assert_eq!(answers.get("q1"), Some("b"));
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn empty_string_is_not_answered() {
        let mut answers = AnswerSet::new();
        answers.record("q1", "");

        assert!(!answers.is_answered("q1"));
        assert!(!answers.is_answered("missing"));
    }

    #[test]
    fn whitespace_counts_as_answered() {
        let mut answers = AnswerSet::new();
        answers.record("q1", " ");
        assert!(answers.is_answered("q1"));
    }

    #[test]
    fn serializes_as_plain_object() {
        let answers: AnswerSet = [("q1", "chill"), ("q2", "nothing")].into_iter().collect();
        let json = serde_json::to_value(&answers).unwrap();
        assert_eq!(json, serde_json::json!({"q1": "chill", "q2": "nothing"}));
    }
}
