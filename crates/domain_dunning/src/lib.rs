//! Dunning Domain - Invoice status derivation and reminder scheduling
//!
//! This crate decides, for an invoice snapshot at a given date, which single
//! status it shows and which reminder (email or phone task) is due next.
//!
//! # Status dimensions
//!
//! An invoice carries three independent stored dimensions:
//! - **Send status**: pending or sent
//! - **Payment status**: unpaid, partial, pending payment, paid
//! - **Reminder status**: highest reminder step reached, or manual follow-up
//!
//! Together with the computed overdue condition they collapse into one
//! [`MainStatus`]. The main status is a projection and is never stored.
//!
//! # Reminder scheduling
//!
//! An organization configures up to four reminder steps, each a number of
//! days after the due date. The scheduler reads the invoice, the step policy
//! and the reminder history and reports what is due, and when automated
//! dunning is exhausted. It never writes: persisting records and advancing
//! `reminder_status` belong to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_dunning::{derive_status, next_pending_reminder, ReminderStepPolicy, ReminderStep};
//!
//! let policy = ReminderStepPolicy::new(
//!     vec![ReminderStep::email(15), ReminderStep::email(30), ReminderStep::phone(45)],
//!     Some(15),
//! )?;
//!
//! let report = derive_status(&invoice, today);
//! if let Some(reminder) = next_pending_reminder(&invoice, &policy, &history, today, &tz) {
//!     // send it, then record it
//! }
//! ```

pub mod invoice;
pub mod status;
pub mod policy;
pub mod reminder;
pub mod scheduler;
pub mod events;
pub mod error;

pub use invoice::{InvoiceSnapshot, SendStatus, PaymentStatus, ReminderStatus};
pub use status::{derive_status, derive_status_at, MainStatus, StatusReport, StatusTone};
pub use policy::{
    ReminderChannel, ReminderStep, ReminderStepPolicy, StepSlot, MANUAL_FOLLOWUP_INDEX,
    MAX_REMINDER_STEPS,
};
pub use reminder::{CompletionStatus, PlannedReminder, ReminderOrigin, ReminderRecord};
pub use scheduler::{
    escalation_decision, next_pending_reminder, plan_actions, plan_batch, simulate_schedule,
    DunningAction, Escalation, SimulatedSchedule,
};
pub use events::{
    transition_events, DunningEvent, DunningEventRecorder, InMemoryEventRecorder, RecordedEvent,
};
pub use error::DunningError;
