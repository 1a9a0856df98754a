use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::models::{AnswerSet, Question};
use crate::sink::SinkError;

/// The step a survey session is in.
///
/// - `Identity`: Waiting for the respondent to pick an alias
/// - `Survey`: Walking through the questions one at a time
/// - `Submitted`: Answers were stored; only "start over" leaves this step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Identity,
    Survey,
    Submitted,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Survey => "survey",
            Self::Submitted => "submitted",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected transitions.
///
/// `EmptyIdentity` and `Unanswered` are the validation warnings a respondent
/// sees inline. The rest indicate a caller driving the session out of order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurveyError {
    #[error("Please enter an alias before continuing.")]
    EmptyIdentity,

    #[error("Please answer the current question before proceeding.")]
    Unanswered { question_id: String },

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Cannot {action} during the {step} step")]
    WrongStep { action: &'static str, step: Step },

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("No submission is in progress")]
    NoSubmissionInFlight,
}

impl SurveyError {
    /// Whether this is a respondent-facing validation warning.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyIdentity | Self::Unanswered { .. })
    }
}

/// Identity and answers frozen at the moment the last question was advanced.
///
/// The snapshot is owned, so the session can't mutate what the sink receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub identity: String,
    pub answers: AnswerSet,
}

/// What a guarded advance did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Pointer moved to the given question index.
    Moved { index: usize },
    /// The last question was answered; the caller must dispatch this snapshot
    /// exactly once and report back through [`SurveySession::complete`].
    Submit(PendingSubmission),
    /// A submission is already in flight, so nothing happened.
    Suppressed,
}

/// One respondent's pass through the survey.
///
/// All transitions are synchronous. Sending the frozen answers to a sink is the
/// caller's job, see [`SurveyController`](super::SurveyController).
#[derive(Debug, Clone)]
pub struct SurveySession {
    catalog: Arc<Catalog>,
    step: Step,
    identity: String,
    answers: AnswerSet,
    current: usize,
    submitting: bool,
}

impl SurveySession {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            step: Step::Identity,
            identity: String::new(),
            answers: AnswerSet::new(),
            current: 0,
            submitting: false,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The question on screen, only while in the `Survey` step.
    pub fn current_question(&self) -> Option<&Question> {
        match self.step {
            Step::Survey => self.catalog.get(self.current),
            _ => None,
        }
    }

    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.catalog.len()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// `Identity → Survey`. The alias is stored trimmed.
    pub fn begin(&mut self, identity: &str) -> Result<(), SurveyError> {
        self.expect_step(Step::Identity, "enter an alias")?;

        let identity = identity.trim();
        if identity.is_empty() {
            return Err(SurveyError::EmptyIdentity);
        }

        self.identity = identity.to_string();
        self.current = 0;
        self.step = Step::Survey;
        Ok(())
    }

    /// Stores an answer, replacing any earlier value for the same question.
    pub fn record_answer(&mut self, question_id: &str, value: &str) -> Result<(), SurveyError> {
        self.expect_step(Step::Survey, "record an answer")?;
        if self.submitting {
            return Err(SurveyError::SubmissionInFlight);
        }
        if self.catalog.find(question_id).is_none() {
            return Err(SurveyError::UnknownQuestion(question_id.to_string()));
        }

        self.answers.record(question_id, value);
        Ok(())
    }

    /// Guarded advance from the current question.
    pub fn advance(&mut self) -> Result<Advance, SurveyError> {
        self.expect_step(Step::Survey, "advance")?;
        if self.submitting {
            return Ok(Advance::Suppressed);
        }

        let question = self
            .catalog
            .get(self.current)
            .ok_or_else(|| SurveyError::UnknownQuestion(format!("#{}", self.current)))?;
        if !self.answers.is_answered(&question.id) {
            return Err(SurveyError::Unanswered {
                question_id: question.id.clone(),
            });
        }

        if !self.is_last_question() {
            self.current += 1;
            return Ok(Advance::Moved {
                index: self.current,
            });
        }

        self.submitting = true;
        Ok(Advance::Submit(PendingSubmission {
            identity: self.identity.clone(),
            answers: self.answers.clone(),
        }))
    }

    /// Applies the sink's answer to the in-flight submission.
    ///
    /// Success moves to `Submitted`. Failure leaves the session on the last
    /// question with every answer intact so the respondent can try again.
    pub fn complete(&mut self, result: &Result<(), SinkError>) -> Result<(), SurveyError> {
        if !self.submitting {
            return Err(SurveyError::NoSubmissionInFlight);
        }

        self.submitting = false;
        if result.is_ok() {
            self.step = Step::Submitted;
        }
        Ok(())
    }

    /// `Submitted → Identity`, wiping the alias, answers and pointer.
    pub fn start_over(&mut self) -> Result<(), SurveyError> {
        self.expect_step(Step::Submitted, "start over")?;

        self.identity.clear();
        self.answers.clear();
        self.current = 0;
        self.step = Step::Identity;
        Ok(())
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            step: self.step,
            identity: self.identity.clone(),
            answers: self.answers.clone(),
            current_index: self.current,
            question_count: self.catalog.len(),
            current_question: self.current_question().cloned(),
            is_last_question: self.step == Step::Survey && self.is_last_question(),
            submitting: self.submitting,
        }
    }

    fn expect_step(&self, expected: Step, action: &'static str) -> Result<(), SurveyError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(SurveyError::WrongStep {
                action,
                step: self.step,
            })
        }
    }
}

/// Serializable snapshot of a session, as rendered by a front end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionView {
    pub step: Step,
    pub identity: String,
    pub answers: AnswerSet,
    pub current_index: usize,
    pub question_count: usize,
    pub current_question: Option<Question>,
    pub is_last_question: bool,
    pub submitting: bool,
}
