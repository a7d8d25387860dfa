//! Dunning domain errors
//!
//! Status derivation and scheduling are total and never fail. These errors
//! come from configuration-time validation, caller-side snooze requests and
//! event recorders.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur in the dunning domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DunningError {
    /// Step delays are not strictly increasing
    #[error("Invalid reminder policy: step {index} delay {delay_days}d must exceed previous delay {previous_days}d")]
    NonIncreasingDelay {
        index: usize,
        delay_days: u32,
        previous_days: u32,
    },

    /// More steps configured than there are reminder statuses
    #[error("Too many reminder steps: {count} configured, at most {max} supported")]
    TooManySteps { count: usize, max: usize },

    /// Snooze does not move the due date forward
    #[error("Invalid snooze: new due date {requested} must be after {current}")]
    InvalidSnooze {
        current: NaiveDate,
        requested: NaiveDate,
    },

    /// The event recorder could not accept an event
    #[error("Event recorder error: {0}")]
    Recorder(String),
}
