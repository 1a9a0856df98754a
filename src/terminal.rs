//! Line-based terminal front end.
//!
//! Renders one panel at a time (alias entry, the current question, thank-you)
//! and feeds the respondent's input into a shared survey session through a
//! [`SurveyController`]. Generic over the reader and writer so it can be driven
//! from tests.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::models::{Question, QuestionKind};
use crate::survey::{AdvanceOutcome, SharedSession, Step, SurveyController};

const CONFETTI: &str = "🎉 🎊 🥳 ✨ 🎈 🤩 🚀 👏 💯";

/// How a terminal run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Completed passes accepted by the sink.
    pub submitted: usize,
}

pub struct TerminalSurvey<R, W> {
    input: R,
    output: W,
    controller: SurveyController,
}

impl<R: BufRead, W: Write> TerminalSurvey<R, W> {
    pub fn new(input: R, output: W, controller: SurveyController) -> Self {
        Self {
            input,
            output,
            controller,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the respondent declines to start over or input ends.
    pub async fn run(&mut self, session: &SharedSession) -> Result<RunSummary> {
        let mut summary = RunSummary { submitted: 0 };

        loop {
            let step = session.lock().expect("session lock poisoned").step();
            let keep_going = match step {
                Step::Identity => self.identity_panel(session)?,
                Step::Survey => self.question_panel(session, &mut summary).await?,
                Step::Submitted => self.thank_you_panel(session)?,
            };
            if !keep_going {
                return Ok(summary);
            }
        }
    }

    fn identity_panel(&mut self, session: &SharedSession) -> Result<bool> {
        writeln!(self.output, "\nDEI Survey")?;
        writeln!(self.output, "Any anonymous name you want to be known by?")?;
        write!(self.output, "> ")?;
        self.output.flush()?;

        let Some(line) = self.read_line()? else {
            return Ok(false);
        };

        let result = session
            .lock()
            .expect("session lock poisoned")
            .begin(&line);
        if let Err(e) = result {
            self.warn("Hold on!", &e.to_string())?;
        }
        Ok(true)
    }

    async fn question_panel(
        &mut self,
        session: &SharedSession,
        summary: &mut RunSummary,
    ) -> Result<bool> {
        let (question, index, count, existing) = {
            let session = session.lock().expect("session lock poisoned");
            let Some(question) = session.current_question().cloned() else {
                return Ok(false);
            };
            let existing = session.answers().get(&question.id).map(str::to_string);
            (
                question,
                session.current_index(),
                session.catalog().len(),
                existing,
            )
        };

        self.render_question(&question, index, count, existing.as_deref())?;

        let Some(line) = self.read_line()? else {
            return Ok(false);
        };

        if let Some(value) = self.interpret(&question, line.trim())? {
            session
                .lock()
                .expect("session lock poisoned")
                .record_answer(&question.id, &value)?;
        }

        match self.controller.advance(session).await {
            Ok(AdvanceOutcome::Submitted) => {
                summary.submitted += 1;
                writeln!(self.output, "\n{}", CONFETTI)?;
            }
            Ok(AdvanceOutcome::Failed { reason }) => {
                self.warn("Submission Failed", &reason)?;
                writeln!(self.output, "Press Enter to try again.")?;
            }
            Ok(AdvanceOutcome::Moved { .. }) | Ok(AdvanceOutcome::Suppressed) => {}
            Err(e) if e.is_validation() => self.warn("Hold on!", &e.to_string())?,
            Err(e) => return Err(e.into()),
        }
        Ok(true)
    }

    fn thank_you_panel(&mut self, session: &SharedSession) -> Result<bool> {
        writeln!(self.output, "\nThank you!")?;
        writeln!(self.output, "Thanks for filling it out.")?;
        write!(self.output, "Start over? [y/N] ")?;
        self.output.flush()?;

        let Some(line) = self.read_line()? else {
            return Ok(false);
        };
        if !line.trim().eq_ignore_ascii_case("y") {
            return Ok(false);
        }

        session
            .lock()
            .expect("session lock poisoned")
            .start_over()?;
        Ok(true)
    }

    fn render_question(
        &mut self,
        question: &Question,
        index: usize,
        count: usize,
        existing: Option<&str>,
    ) -> Result<()> {
        let dots: Vec<&str> = (0..count)
            .map(|i| if i == index { "●" } else { "○" })
            .collect();
        writeln!(self.output, "\n{}", dots.join(" "))?;
        writeln!(self.output, "{}", question.question_text)?;

        for (i, option) in question.options.iter().enumerate() {
            let marker = if existing == Some(option.value.as_str()) {
                "*"
            } else {
                " "
            };
            match (&question.kind, &option.icon) {
                (QuestionKind::VibeChoice, Some(icon)) => {
                    writeln!(self.output, " {}{}) {} {}", marker, i + 1, icon, option.label)?
                }
                (QuestionKind::IconChoice, Some(icon)) => {
                    writeln!(self.output, " {}{}) [{}] {}", marker, i + 1, icon, option.label)?
                }
                _ => writeln!(self.output, " {}{}) {}", marker, i + 1, option.label)?,
            }
        }

        if let Some(existing) = existing.filter(|_| !question.kind.is_select()) {
            writeln!(self.output, "(current answer: {})", existing)?;
        }

        let action = if index + 1 == count { "Submit" } else { "Next" };
        write!(self.output, "[{}] > ", action)?;
        self.output.flush()?;
        Ok(())
    }

    /// Maps raw input to an answer value. A blank line keeps whatever is
    /// already recorded; an unrecognised choice warns and records nothing.
    fn interpret(&mut self, question: &Question, input: &str) -> Result<Option<String>> {
        if input.is_empty() {
            return Ok(None);
        }
        if !question.kind.is_select() {
            return Ok(Some(input.to_string()));
        }

        let by_position = input
            .parse::<usize>()
            .ok()
            .and_then(|n| question.option_at(n));
        if let Some(option) = by_position {
            return Ok(Some(option.value.clone()));
        }
        if question.accepts(input) {
            return Ok(Some(input.to_string()));
        }

        self.warn(
            "Hold on!",
            &format!("Pick a number between 1 and {}.", question.options.len()),
        )?;
        Ok(None)
    }

    fn warn(&mut self, title: &str, description: &str) -> Result<()> {
        writeln!(self.output, "! {}: {}", title, description)?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
