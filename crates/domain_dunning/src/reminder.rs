//! Reminder records and planned reminders
//!
//! History is append-only and owned by the storage collaborator. The engine
//! reads it to know which steps have fired and answers with
//! [`PlannedReminder`] values that the collaborator may persist.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{InvoiceId, ReminderId};

use crate::invoice::ReminderStatus;
use crate::policy::ReminderChannel;

/// Outcome of a reminder record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Pending,
    Completed,
    /// Settled without success; never retried automatically
    Failed,
}

impl CompletionStatus {
    /// Completed or failed
    pub fn is_settled(&self) -> bool {
        !matches!(self, CompletionStatus::Pending)
    }
}

/// One reminder in an invoice's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRecord {
    pub id: ReminderId,
    pub invoice_id: InvoiceId,
    /// Step this record belongs to
    pub reminder_status: ReminderStatus,
    pub reminder_type: ReminderChannel,
    pub scheduled_at: DateTime<Utc>,
    pub completion_status: CompletionStatus,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ReminderRecord {
    /// Creates a pending record
    pub fn pending(
        invoice_id: InvoiceId,
        reminder_status: ReminderStatus,
        reminder_type: ReminderChannel,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReminderId::new_v7(),
            invoice_id,
            reminder_status,
            reminder_type,
            scheduled_at,
            completion_status: CompletionStatus::Pending,
            completed_at: None,
        }
    }

    /// Marks the record completed at `at`
    pub fn complete(mut self, at: DateTime<Utc>) -> Self {
        self.completion_status = CompletionStatus::Completed;
        self.completed_at = Some(at);
        self
    }

    /// Marks the record failed at `at`
    pub fn fail(mut self, at: DateTime<Utc>) -> Self {
        self.completion_status = CompletionStatus::Failed;
        self.completed_at = Some(at);
        self
    }

    pub fn is_pending(&self) -> bool {
        self.completion_status == CompletionStatus::Pending
    }
}

/// Where a planned reminder came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reminder_id", rename_all = "snake_case")]
pub enum ReminderOrigin {
    /// An existing pending record in history
    Recorded(ReminderId),
    /// A step whose threshold has passed and has no record yet
    Synthesized,
    /// A projection for a hypothetical date
    Simulated,
}

/// A reminder the engine reports as due, pending or projected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedReminder {
    pub invoice_id: InvoiceId,
    pub reminder_status: ReminderStatus,
    pub reminder_type: ReminderChannel,
    /// Calendar date the step becomes due
    pub due_on: NaiveDate,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub content_ref: Option<String>,
    pub origin: ReminderOrigin,
}

impl PlannedReminder {
    /// Turns a synthesized reminder into the pending record to persist
    pub fn to_pending_record(&self) -> ReminderRecord {
        ReminderRecord::pending(
            self.invoice_id,
            self.reminder_status,
            self.reminder_type,
            self.scheduled_at,
        )
    }
}
