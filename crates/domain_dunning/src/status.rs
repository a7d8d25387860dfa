//! Status derivation
//!
//! Collapses the three stored status dimensions (send, payment, reminder) and
//! the computed overdue condition into the single [`MainStatus`] used for
//! labels, filtering and sorting. The main status is a projection: it is never
//! stored and is recomputed on every read.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::temporal::days_between;
use core_kernel::{Money, Timezone};

use crate::invoice::{InvoiceSnapshot, PaymentStatus, ReminderStatus, SendStatus};

/// The single UI-facing status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainStatus {
    Pending,
    Sent,
    Overdue,
    #[serde(rename = "reminder_1")]
    Reminder1,
    #[serde(rename = "reminder_2")]
    Reminder2,
    #[serde(rename = "reminder_3")]
    Reminder3,
    #[serde(rename = "reminder_4")]
    Reminder4,
    ManualFollowup,
    PendingPayment,
    Paid,
}

/// Badge color family for a status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Neutral,
    Info,
    Warning,
    Danger,
    Success,
}

impl MainStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MainStatus::Pending => "Pending",
            MainStatus::Sent => "Sent",
            MainStatus::Overdue => "Overdue",
            MainStatus::Reminder1 => "Reminder 1",
            MainStatus::Reminder2 => "Reminder 2",
            MainStatus::Reminder3 => "Reminder 3",
            MainStatus::Reminder4 => "Reminder 4",
            MainStatus::ManualFollowup => "Manual follow-up",
            MainStatus::PendingPayment => "Payment pending",
            MainStatus::Paid => "Paid",
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            MainStatus::Pending => StatusTone::Neutral,
            MainStatus::Sent | MainStatus::PendingPayment => StatusTone::Info,
            MainStatus::Overdue | MainStatus::Reminder1 | MainStatus::Reminder2 => StatusTone::Warning,
            MainStatus::Reminder3 | MainStatus::Reminder4 | MainStatus::ManualFollowup => StatusTone::Danger,
            MainStatus::Paid => StatusTone::Success,
        }
    }

    /// Sort key, most urgent first
    pub fn sort_rank(&self) -> u8 {
        match self {
            MainStatus::ManualFollowup => 0,
            MainStatus::Reminder4 => 1,
            MainStatus::Reminder3 => 2,
            MainStatus::Reminder2 => 3,
            MainStatus::Reminder1 => 4,
            MainStatus::Overdue => 5,
            MainStatus::PendingPayment => 6,
            MainStatus::Sent => 7,
            MainStatus::Pending => 8,
            MainStatus::Paid => 9,
        }
    }

    /// Paid is the only state nothing moves out of
    pub fn is_terminal(&self) -> bool {
        matches!(self, MainStatus::Paid)
    }

    /// Returns true if automated reminders may still be scheduled
    pub fn accepts_reminders(&self) -> bool {
        matches!(
            self,
            MainStatus::Sent
                | MainStatus::Overdue
                | MainStatus::Reminder1
                | MainStatus::Reminder2
                | MainStatus::Reminder3
                | MainStatus::Reminder4
        )
    }
}

impl std::fmt::Display for MainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything derived from one invoice snapshot at one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub main_status: MainStatus,
    pub is_overdue: bool,
    /// Whole days past the due date, 0 unless overdue
    pub days_past_due: i64,
    pub has_partial_payment: bool,
    /// Collected amount when partially paid, zero otherwise
    pub partial_amount: Money,
    pub outstanding_balance: Money,
}

/// Derives the status report of `invoice` as of the calendar date `as_of`
pub fn derive_status(invoice: &InvoiceSnapshot, as_of: NaiveDate) -> StatusReport {
    let outstanding_balance = invoice.outstanding();
    let has_partial_payment = invoice.payment_status == PaymentStatus::Partial;
    let partial_amount = if has_partial_payment {
        invoice.paid()
    } else {
        Money::zero(invoice.currency)
    };

    let is_overdue = invoice.due_date < as_of
        && !matches!(
            invoice.payment_status,
            PaymentStatus::Paid | PaymentStatus::PendingPayment
        );

    let days_past_due = if is_overdue {
        days_between(invoice.due_date, as_of)
    } else {
        0
    };

    StatusReport {
        main_status: select_main_status(
            invoice.send_status,
            invoice.payment_status,
            invoice.reminder_status,
            is_overdue,
        ),
        is_overdue,
        days_past_due,
        has_partial_payment,
        partial_amount,
        outstanding_balance,
    }
}

/// Derives the status report at an instant, read as a local date in `tz`
pub fn derive_status_at(
    invoice: &InvoiceSnapshot,
    now: DateTime<Utc>,
    tz: &Timezone,
) -> StatusReport {
    derive_status(invoice, tz.local_date(now))
}

/// Priority chain; the first matching arm wins.
///
/// Unsent beats everything, paid beats reminder and overdue state, a payment
/// awaiting clearance beats reminders, and an active reminder level is shown
/// instead of the generic overdue label. The fallback to `Pending` for an
/// unsent invoice is covered by the first arm, so the match is exhaustive
/// without a catch-all.
fn select_main_status(
    send: SendStatus,
    payment: PaymentStatus,
    reminder: ReminderStatus,
    is_overdue: bool,
) -> MainStatus {
    use ReminderStatus as R;

    match (send, payment, reminder, is_overdue) {
        (SendStatus::Pending, _, _, _) => MainStatus::Pending,
        (_, PaymentStatus::Paid, _, _) => MainStatus::Paid,
        (_, PaymentStatus::PendingPayment, _, _) => MainStatus::PendingPayment,
        (_, _, R::ManualFollowup, _) => MainStatus::ManualFollowup,
        (_, _, R::Reminder1, _) => MainStatus::Reminder1,
        (_, _, R::Reminder2, _) => MainStatus::Reminder2,
        (_, _, R::Reminder3, _) => MainStatus::Reminder3,
        (_, _, R::Reminder4, _) => MainStatus::Reminder4,
        (_, _, R::None, true) => MainStatus::Overdue,
        (SendStatus::Sent, _, R::None, false) => MainStatus::Sent,
    }
}
