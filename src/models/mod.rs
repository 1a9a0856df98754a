//! Domain models for the vibe check survey.
//!
//! # Core Concepts
//!
//! ## Static Data
//!
//! - [`Question`]: A single survey prompt. Select questions carry an ordered list of
//!   [`QuestionOption`]s; free-text questions do not.
//!
//! ## Per-Pass Data
//!
//! - [`AnswerSet`]: Accumulated question id → answer value mapping for one pass
//!   through the survey. Cleared when the respondent starts over.
//!
//! ## Persisted Data
//!
//! - [`Submission`]: The append-only record written by a feedback sink, stamped
//!   with the time of the write.

mod answers;
mod question;
mod submission;

pub use answers::*;
pub use question::*;
pub use submission::*;
