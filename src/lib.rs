//! Anonymous course feedback survey.
//!
//! A respondent picks an alias, answers the questions one at a time, and the
//! completed answer set is handed once to a [`sink::FeedbackSink`]. The flow is
//! exposed over HTTP ([`api`]) and as an interactive terminal ([`terminal`]).

pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod db;
pub mod models;
pub mod sink;
pub mod survey;
pub mod terminal;
