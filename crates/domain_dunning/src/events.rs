//! Dunning transition events
//!
//! The engine never persists anything. When a caller re-derives an invoice's
//! status after a change (a payment, a new reminder, the passage of time) it
//! can compare the two reports with [`transition_events`] and hand the
//! resulting facts to a [`DunningEventRecorder`] for its audit trail.

use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{DunningEventId, InvoiceId};

use crate::error::DunningError;
use crate::invoice::ReminderStatus;
use crate::status::{MainStatus, StatusReport};

/// Facts emitted when an invoice's derived status moves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DunningEvent {
    /// The due date has passed with the invoice still unpaid
    InvoiceBecameOverdue {
        invoice_id: InvoiceId,
        days_past_due: i64,
        occurred_on: NaiveDate,
    },

    /// A numbered reminder step became the current status
    ReminderStepReached {
        invoice_id: InvoiceId,
        step: ReminderStatus,
        occurred_on: NaiveDate,
    },

    /// Automated steps exhausted
    EscalatedToManualFollowup {
        invoice_id: InvoiceId,
        occurred_on: NaiveDate,
    },

    /// Payment instruments logged, awaiting clearance
    PaymentPendingClearance {
        invoice_id: InvoiceId,
        occurred_on: NaiveDate,
    },

    /// Invoice fully collected
    InvoicePaid {
        invoice_id: InvoiceId,
        occurred_on: NaiveDate,
    },

    /// Any change of main status
    StatusChanged {
        invoice_id: InvoiceId,
        from: MainStatus,
        to: MainStatus,
        occurred_on: NaiveDate,
    },
}

impl DunningEvent {
    /// Returns the invoice ID associated with this event
    pub fn invoice_id(&self) -> InvoiceId {
        match self {
            DunningEvent::InvoiceBecameOverdue { invoice_id, .. } => *invoice_id,
            DunningEvent::ReminderStepReached { invoice_id, .. } => *invoice_id,
            DunningEvent::EscalatedToManualFollowup { invoice_id, .. } => *invoice_id,
            DunningEvent::PaymentPendingClearance { invoice_id, .. } => *invoice_id,
            DunningEvent::InvoicePaid { invoice_id, .. } => *invoice_id,
            DunningEvent::StatusChanged { invoice_id, .. } => *invoice_id,
        }
    }

    pub fn occurred_on(&self) -> NaiveDate {
        match self {
            DunningEvent::InvoiceBecameOverdue { occurred_on, .. } => *occurred_on,
            DunningEvent::ReminderStepReached { occurred_on, .. } => *occurred_on,
            DunningEvent::EscalatedToManualFollowup { occurred_on, .. } => *occurred_on,
            DunningEvent::PaymentPendingClearance { occurred_on, .. } => *occurred_on,
            DunningEvent::InvoicePaid { occurred_on, .. } => *occurred_on,
            DunningEvent::StatusChanged { occurred_on, .. } => *occurred_on,
        }
    }
}

/// Lists the events implied by moving from `before` to `after`
///
/// Specific events come first, followed by one `StatusChanged` when the main
/// status differs. Identical reports produce nothing.
pub fn transition_events(
    invoice_id: InvoiceId,
    before: &StatusReport,
    after: &StatusReport,
    occurred_on: NaiveDate,
) -> Vec<DunningEvent> {
    let mut events = Vec::new();

    if after.is_overdue && !before.is_overdue {
        events.push(DunningEvent::InvoiceBecameOverdue {
            invoice_id,
            days_past_due: after.days_past_due,
            occurred_on,
        });
    }

    if before.main_status == after.main_status {
        return events;
    }

    match after.main_status {
        MainStatus::Reminder1 | MainStatus::Reminder2 | MainStatus::Reminder3 | MainStatus::Reminder4 => {
            if let Some(step) = reminder_step(after.main_status) {
                events.push(DunningEvent::ReminderStepReached {
                    invoice_id,
                    step,
                    occurred_on,
                });
            }
        }
        MainStatus::ManualFollowup => {
            events.push(DunningEvent::EscalatedToManualFollowup { invoice_id, occurred_on });
        }
        MainStatus::PendingPayment => {
            events.push(DunningEvent::PaymentPendingClearance { invoice_id, occurred_on });
        }
        MainStatus::Paid => {
            events.push(DunningEvent::InvoicePaid { invoice_id, occurred_on });
        }
        MainStatus::Pending | MainStatus::Sent | MainStatus::Overdue => {}
    }

    events.push(DunningEvent::StatusChanged {
        invoice_id,
        from: before.main_status,
        to: after.main_status,
        occurred_on,
    });

    events
}

fn reminder_step(status: MainStatus) -> Option<ReminderStatus> {
    match status {
        MainStatus::Reminder1 => Some(ReminderStatus::Reminder1),
        MainStatus::Reminder2 => Some(ReminderStatus::Reminder2),
        MainStatus::Reminder3 => Some(ReminderStatus::Reminder3),
        MainStatus::Reminder4 => Some(ReminderStatus::Reminder4),
        _ => None,
    }
}

/// Sink for dunning events, implemented by the audit collaborator
pub trait DunningEventRecorder: Send + Sync {
    fn record(&self, event: DunningEvent) -> Result<(), DunningError>;

    /// Records events in order, stopping at the first failure
    fn record_all(&self, events: Vec<DunningEvent>) -> Result<(), DunningError> {
        events.into_iter().try_for_each(|event| self.record(event))
    }
}

/// An event as stored by [`InMemoryEventRecorder`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub id: DunningEventId,
    pub event: DunningEvent,
}

/// Recorder keeping events in memory, for tests and previews
#[derive(Debug, Default)]
pub struct InMemoryEventRecorder {
    events: Mutex<Vec<RecordedEvent>>,
}

impl InMemoryEventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, oldest first
    pub fn events(&self) -> Result<Vec<RecordedEvent>, DunningError> {
        self.events
            .lock()
            .map(|events| events.clone())
            .map_err(|e| DunningError::Recorder(e.to_string()))
    }

    /// Events recorded for one invoice
    pub fn events_for(&self, invoice_id: InvoiceId) -> Result<Vec<DunningEvent>, DunningError> {
        Ok(self
            .events()?
            .into_iter()
            .filter(|r| r.event.invoice_id() == invoice_id)
            .map(|r| r.event)
            .collect())
    }
}

impl DunningEventRecorder for InMemoryEventRecorder {
    fn record(&self, event: DunningEvent) -> Result<(), DunningError> {
        let mut events = self
            .events
            .lock()
            .map_err(|e| DunningError::Recorder(e.to_string()))?;

        events.push(RecordedEvent {
            id: DunningEventId::new_v7(),
            event,
        });
        Ok(())
    }
}
