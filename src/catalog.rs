//! The ordered question catalog a survey walks through.
//!
//! A catalog is fixed for the lifetime of the process: the built-in course
//! survey, or one loaded from a JSON file (an array of [`Question`]s).

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use crate::models::{Question, QuestionKind, QuestionOption};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Question catalog is empty")]
    Empty,

    #[error("Duplicate question id: {0}")]
    DuplicateId(String),

    #[error("Question {0} has an empty id or prompt")]
    Blank(usize),

    #[error("Select question {0} has no options")]
    MissingOptions(String),

    #[error("Failed to read question catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse question catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An ordered, validated, non-empty sequence of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    questions: Vec<Question>,
}

impl Catalog {
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, q) in questions.iter().enumerate() {
            if q.id.trim().is_empty() || q.question_text.trim().is_empty() {
                return Err(CatalogError::Blank(index));
            }
            if !seen.insert(q.id.as_str()) {
                return Err(CatalogError::DuplicateId(q.id.clone()));
            }
            if q.kind.is_select() && q.options.is_empty() {
                return Err(CatalogError::MissingOptions(q.id.clone()));
            }
        }

        Ok(Self { questions })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Loads `path` when given, otherwise the built-in course survey.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => {
                let catalog = Self::from_json_file(path)?;
                tracing::info!(
                    "Loaded {} questions from {}",
                    catalog.len(),
                    path.display()
                );
                Ok(catalog)
            }
            None => Ok(Self::course_survey()),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed catalog; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The built-in six-question course feedback survey.
    pub fn course_survey() -> Self {
        let questions = vec![
            Question {
                id: "q1_vibe".to_string(),
                kind: QuestionKind::VibeChoice,
                question_text:
                    "If the introduction to this course were a playlist, what would its vibe be?"
                        .to_string(),
                options: vec![
                    QuestionOption::new("chill", "Chill & thoughtful", "🎧"),
                    QuestionOption::new("chaotic", "Chaotic but fun", "🎶"),
                    QuestionOption::new("structured", "Structured & sharp", "🎼"),
                    QuestionOption::new("buffering", "Still buffering", "⏳"),
                ],
            },
            Question {
                id: "q2_concept".to_string(),
                kind: QuestionKind::Text,
                question_text:
                    "What's one concept that made you feel like a 'designer-in-training'?"
                        .to_string(),
                options: vec![],
            },
            Question {
                id: "q3_workout".to_string(),
                kind: QuestionKind::IconChoice,
                question_text: "Which part felt like a mental workout?".to_string(),
                options: vec![
                    QuestionOption::new("stakeholder-mapping", "Stakeholder mapping", "users"),
                    QuestionOption::new("brainstorming", "Brainstorming", "brain-circuit"),
                    QuestionOption::new("empathizing", "Empathizing", "heart"),
                    QuestionOption::new(
                        "design-frameworks",
                        "Design frameworks",
                        "drafting-compass",
                    ),
                    QuestionOption::new("team-formation", "Team formation", "users-round"),
                ],
            },
            Question {
                id: "q4_unclear".to_string(),
                kind: QuestionKind::Text,
                question_text: "Did anything feel rushed or unclear? Drop a quick note."
                    .to_string(),
                options: vec![],
            },
            Question {
                id: "q5_mindset_shift".to_string(),
                kind: QuestionKind::Text,
                question_text:
                    "Has your mindset shifted since starting this course? If yes, how?"
                        .to_string(),
                options: vec![],
            },
            Question {
                id: "q6_instructor_click".to_string(),
                kind: QuestionKind::Text,
                question_text: "What's one thing your instructor did that made the topic click?"
                    .to_string(),
                options: vec![],
            },
        ];

        Self { questions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(id: &str) -> Question {
        Question {
            id: id.to_string(),
            kind: QuestionKind::Text,
            question_text: format!("Question {}", id),
            options: vec![],
        }
    }

    #[test]
    fn course_survey_is_valid() {
        let builtin = Catalog::course_survey();
        let rebuilt = Catalog::new(builtin.questions().to_vec()).unwrap();
        assert_eq!(rebuilt.len(), 6);
        assert_eq!(rebuilt.get(0).unwrap().id, "q1_vibe");
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(matches!(Catalog::new(vec![]), Err(CatalogError::Empty)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = Catalog::new(vec![text("q1"), text("q1")]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id == "q1"));
    }

    #[test]
    fn rejects_select_without_options() {
        let mut q = text("q1");
        q.kind = QuestionKind::VibeChoice;
        let result = Catalog::new(vec![q]);
        assert!(matches!(result, Err(CatalogError::MissingOptions(_))));
    }

    #[test]
    fn rejects_blank_id() {
        let result = Catalog::new(vec![text("q1"), text(" ")]);
        assert!(matches!(result, Err(CatalogError::Blank(1))));
    }

    #[test]
    fn parses_json_catalog() {
        let json = r#"[
            {"id": "q1", "kind": "mc-vibe", "question_text": "Vibe?",
             "options": [{"value": "chill", "label": "Chill", "icon": "🎧"}]},
            {"id": "q2", "kind": "text", "question_text": "Anything else?"}
        ]"#;

        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find("q2").unwrap().kind, QuestionKind::Text);
    }

    #[test]
    fn load_without_path_uses_course_survey() {
        let catalog = Catalog::load(None).unwrap();
        assert_eq!(catalog, Catalog::course_survey());
    }
}
