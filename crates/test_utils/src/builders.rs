//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{Currency, InvoiceId};
use domain_dunning::{
    InvoiceSnapshot, PaymentStatus, ReminderChannel, ReminderRecord, ReminderStatus, SendStatus,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{IdFixtures, TemporalFixtures};

/// Builder for invoice snapshots
///
/// Defaults to a sent, unpaid EUR 1000 invoice due on 2026-01-01 with no
/// reminder reached.
pub struct InvoiceSnapshotBuilder {
    id: InvoiceId,
    invoice_number: String,
    send_status: SendStatus,
    payment_status: PaymentStatus,
    reminder_status: ReminderStatus,
    invoice_date: NaiveDate,
    due_date: NaiveDate,
    currency: Currency,
    amount_ttc: Decimal,
    paid_amount: Option<Decimal>,
}

impl Default for InvoiceSnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceSnapshotBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: IdFixtures::invoice_id(),
            invoice_number: "F-2025-0042".to_string(),
            send_status: SendStatus::Sent,
            payment_status: PaymentStatus::Unpaid,
            reminder_status: ReminderStatus::None,
            invoice_date: TemporalFixtures::invoice_date(),
            due_date: TemporalFixtures::due_date(),
            currency: Currency::EUR,
            amount_ttc: dec!(1000.00),
            paid_amount: None,
        }
    }

    pub fn with_id(mut self, id: InvoiceId) -> Self {
        self.id = id;
        self
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.invoice_number = number.into();
        self
    }

    /// Marks the invoice as not yet sent
    pub fn unsent(mut self) -> Self {
        self.send_status = SendStatus::Pending;
        self
    }

    pub fn with_send_status(mut self, status: SendStatus) -> Self {
        self.send_status = status;
        self
    }

    pub fn with_payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = status;
        self
    }

    pub fn with_reminder_status(mut self, status: ReminderStatus) -> Self {
        self.reminder_status = status;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn with_amount(mut self, amount_ttc: Decimal, currency: Currency) -> Self {
        self.amount_ttc = amount_ttc;
        self.currency = currency;
        self
    }

    /// Records a partial payment of `amount`
    pub fn partially_paid(mut self, amount: Decimal) -> Self {
        self.payment_status = PaymentStatus::Partial;
        self.paid_amount = Some(amount);
        self
    }

    /// Marks the invoice fully collected
    pub fn paid(mut self) -> Self {
        self.payment_status = PaymentStatus::Paid;
        self.paid_amount = Some(self.amount_ttc);
        self
    }

    pub fn build(self) -> InvoiceSnapshot {
        InvoiceSnapshot {
            id: self.id,
            invoice_number: self.invoice_number,
            send_status: self.send_status,
            payment_status: self.payment_status,
            reminder_status: self.reminder_status,
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            currency: self.currency,
            amount_ttc: self.amount_ttc,
            paid_amount: self.paid_amount,
        }
    }
}

/// Builder for an invoice's reminder history
pub struct ReminderHistoryBuilder {
    invoice_id: InvoiceId,
    records: Vec<ReminderRecord>,
}

impl ReminderHistoryBuilder {
    pub fn for_invoice(invoice_id: InvoiceId) -> Self {
        Self {
            invoice_id,
            records: Vec::new(),
        }
    }

    /// Adds a record still waiting to be sent
    pub fn pending(mut self, step: ReminderStatus, channel: ReminderChannel, at: DateTime<Utc>) -> Self {
        self.records
            .push(ReminderRecord::pending(self.invoice_id, step, channel, at));
        self
    }

    /// Adds a record that was sent successfully
    pub fn completed(mut self, step: ReminderStatus, channel: ReminderChannel, at: DateTime<Utc>) -> Self {
        self.records
            .push(ReminderRecord::pending(self.invoice_id, step, channel, at).complete(at));
        self
    }

    /// Adds a record that failed to send
    pub fn failed(mut self, step: ReminderStatus, channel: ReminderChannel, at: DateTime<Utc>) -> Self {
        self.records
            .push(ReminderRecord::pending(self.invoice_id, step, channel, at).fail(at));
        self
    }

    pub fn build(self) -> Vec<ReminderRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_builder_defaults() {
        let invoice = InvoiceSnapshotBuilder::new().build();
        assert_eq!(invoice.send_status, SendStatus::Sent);
        assert_eq!(invoice.payment_status, PaymentStatus::Unpaid);
        assert_eq!(invoice.due_date, TemporalFixtures::due_date());
    }

    #[test]
    fn test_partially_paid_sets_amount() {
        let invoice = InvoiceSnapshotBuilder::new().partially_paid(dec!(250)).build();
        assert_eq!(invoice.payment_status, PaymentStatus::Partial);
        assert_eq!(invoice.outstanding().amount(), dec!(750));
    }

    #[test]
    fn test_history_builder() {
        let id = IdFixtures::invoice_id();
        let at = TemporalFixtures::morning_of(TemporalFixtures::first_reminder_day());
        let history = ReminderHistoryBuilder::for_invoice(id)
            .completed(ReminderStatus::Reminder1, ReminderChannel::Email, at)
            .pending(ReminderStatus::Reminder2, ReminderChannel::Email, at)
            .build();

        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|r| r.invoice_id == id));
        assert_eq!(history.iter().filter(|r| r.is_pending()).count(), 1);
    }
}
