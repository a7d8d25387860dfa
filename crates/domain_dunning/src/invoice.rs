//! Invoice snapshot
//!
//! The engine never owns invoices. It reads an immutable snapshot of the three
//! independent status dimensions plus the dates and amounts it needs, taken by
//! the storage collaborator under a single consistency point.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::temporal::add_days;
use core_kernel::{Currency, InvoiceId, Money};

use crate::error::DunningError;

/// Whether the invoice has been dispatched to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendStatus {
    /// Not yet sent
    Pending,
    /// Sent to the client (irreversible)
    Sent,
}

/// Collection state of the invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing collected
    Unpaid,
    /// Some but not all of the total collected
    Partial,
    /// Payment instruments (e.g. checks) logged but not yet cleared
    PendingPayment,
    /// Fully collected
    Paid,
}

/// Highest reminder step reached by the invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    None,
    #[serde(rename = "reminder_1")]
    Reminder1,
    #[serde(rename = "reminder_2")]
    Reminder2,
    #[serde(rename = "reminder_3")]
    Reminder3,
    #[serde(rename = "reminder_4")]
    Reminder4,
    /// Automated steps exhausted; a human takes over
    ManualFollowup,
}

impl ReminderStatus {
    /// The numbered reminder statuses, in escalation order
    pub const NUMBERED: [ReminderStatus; 4] = [
        ReminderStatus::Reminder1,
        ReminderStatus::Reminder2,
        ReminderStatus::Reminder3,
        ReminderStatus::Reminder4,
    ];

    /// Returns the 1-based step number for reminder_1..reminder_4
    pub fn step_number(&self) -> Option<usize> {
        match self {
            ReminderStatus::Reminder1 => Some(1),
            ReminderStatus::Reminder2 => Some(2),
            ReminderStatus::Reminder3 => Some(3),
            ReminderStatus::Reminder4 => Some(4),
            ReminderStatus::None | ReminderStatus::ManualFollowup => None,
        }
    }

    /// Inverse of [`ReminderStatus::step_number`]
    pub fn from_step_number(step: usize) -> Option<ReminderStatus> {
        step.checked_sub(1)
            .and_then(|i| Self::NUMBERED.get(i))
            .copied()
    }

    pub fn is_numbered(&self) -> bool {
        self.step_number().is_some()
    }
}

/// Read-only view of an invoice as the dunning engine needs it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSnapshot {
    pub id: InvoiceId,
    /// Human-readable number, carried for logs and previews
    #[serde(default)]
    pub invoice_number: String,
    pub send_status: SendStatus,
    pub payment_status: PaymentStatus,
    pub reminder_status: ReminderStatus,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub currency: Currency,
    /// Total including tax
    pub amount_ttc: Decimal,
    /// Amount collected so far; absent means nothing collected
    #[serde(default)]
    pub paid_amount: Option<Decimal>,
}

impl InvoiceSnapshot {
    /// Creates the snapshot of a freshly created invoice: unsent, unpaid, no reminder
    pub fn new(
        id: InvoiceId,
        invoice_date: NaiveDate,
        due_date: NaiveDate,
        amount_ttc: Decimal,
        currency: Currency,
    ) -> Self {
        Self {
            id,
            invoice_number: String::new(),
            send_status: SendStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            reminder_status: ReminderStatus::None,
            invoice_date,
            due_date,
            currency,
            amount_ttc,
            paid_amount: None,
        }
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.invoice_number = number.into();
        self
    }

    pub fn total(&self) -> Money {
        Money::new(self.amount_ttc, self.currency)
    }

    pub fn paid(&self) -> Money {
        Money::new(self.paid_amount.unwrap_or(Decimal::ZERO), self.currency)
    }

    /// Total minus collected amount, unclamped
    ///
    /// Both sides carry the invoice currency.
    pub fn outstanding(&self) -> Money {
        self.total() - self.paid()
    }

    /// Returns a copy with the due date deferred to `new_due_date`
    ///
    /// Reminder progress is kept as is: a snoozed invoice resumes its
    /// escalation from the step it had reached.
    pub fn snoozed_to(&self, new_due_date: NaiveDate) -> Result<Self, DunningError> {
        if new_due_date <= self.due_date {
            return Err(DunningError::InvalidSnooze {
                current: self.due_date,
                requested: new_due_date,
            });
        }

        Ok(Self {
            due_date: new_due_date,
            ..self.clone()
        })
    }

    /// Defers the due date by `days` days
    pub fn snoozed_by(&self, days: u32) -> Result<Self, DunningError> {
        self.snoozed_to(add_days(self.due_date, i64::from(days)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn invoice() -> InvoiceSnapshot {
        InvoiceSnapshot::new(
            InvoiceId::new(),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            dec!(1000),
            Currency::EUR,
        )
    }

    #[test]
    fn test_new_invoice_starts_unsent_and_unpaid() {
        let inv = invoice();
        assert_eq!(inv.send_status, SendStatus::Pending);
        assert_eq!(inv.payment_status, PaymentStatus::Unpaid);
        assert_eq!(inv.reminder_status, ReminderStatus::None);
        assert!(inv.paid().is_zero());
    }

    #[test]
    fn test_outstanding_uses_paid_amount() {
        let mut inv = invoice();
        inv.paid_amount = Some(dec!(400));
        assert_eq!(inv.outstanding().amount(), dec!(600));
    }

    #[test]
    fn test_overpayment_leaves_negative_balance() {
        let mut inv = invoice();
        inv.paid_amount = Some(dec!(1200));
        assert_eq!(inv.outstanding().amount(), dec!(-200));
        assert_eq!(inv.outstanding().currency(), Currency::EUR);
    }

    #[test]
    fn test_snooze_keeps_reminder_status() {
        let mut inv = invoice();
        inv.reminder_status = ReminderStatus::Reminder2;

        let snoozed = inv.snoozed_by(10).unwrap();
        assert_eq!(snoozed.due_date, NaiveDate::from_ymd_opt(2026, 1, 11).unwrap());
        assert_eq!(snoozed.reminder_status, ReminderStatus::Reminder2);
    }

    #[test]
    fn test_snooze_must_move_forward() {
        let inv = invoice();
        assert!(matches!(
            inv.snoozed_to(inv.due_date),
            Err(DunningError::InvalidSnooze { .. })
        ));
        assert!(inv.snoozed_by(0).is_err());
    }

    #[test]
    fn test_reminder_status_step_numbers() {
        assert_eq!(ReminderStatus::None.step_number(), None);
        assert_eq!(ReminderStatus::Reminder3.step_number(), Some(3));
        assert_eq!(ReminderStatus::from_step_number(4), Some(ReminderStatus::Reminder4));
        assert_eq!(ReminderStatus::from_step_number(0), None);
        assert_eq!(ReminderStatus::from_step_number(5), None);
    }

    #[test]
    fn test_reminder_status_wire_names() {
        let json = serde_json::to_string(&ReminderStatus::Reminder2).unwrap();
        assert_eq!(json, "\"reminder_2\"");
        let parsed: ReminderStatus = serde_json::from_str("\"manual_followup\"").unwrap();
        assert_eq!(parsed, ReminderStatus::ManualFollowup);
    }
}
