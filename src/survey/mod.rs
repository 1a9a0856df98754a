//! The linear survey flow.
//!
//! A [`SurveySession`] is the state machine for one respondent:
//!
//! ```text
//! Identity --begin--> Survey(0) --advance--> ... --> Survey(last)
//!                                                       |
//!                                        advance: freeze + submit
//!                                          |                  |
//!                                       success            failure
//!                                          v                  v
//! Identity <--start_over-- Submitted       Survey(last), answers kept
//! ```
//!
//! [`SurveyController`] performs the one asynchronous step, handing the frozen
//! answers to a [`FeedbackSink`](crate::sink::FeedbackSink).

mod controller;
mod hook;
mod session;
mod store;

pub use controller::*;
pub use hook::*;
pub use session::*;
pub use store::*;
