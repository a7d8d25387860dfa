//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::NaiveDate;
use core_kernel::temporal::add_days;
use core_kernel::{Currency, InvoiceId};
use domain_dunning::{
    InvoiceSnapshot, PaymentStatus, ReminderChannel, ReminderStatus, ReminderStep,
    ReminderStepPolicy, SendStatus,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::EUR),
        Just(Currency::USD),
        Just(Currency::GBP),
        Just(Currency::CHF),
        Just(Currency::CAD),
        Just(Currency::JPY),
    ]
}

/// Strategy for generating non-negative amounts in minor units
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    0i64..1_000_000_000i64
}

pub fn send_status_strategy() -> impl Strategy<Value = SendStatus> {
    prop_oneof![Just(SendStatus::Pending), Just(SendStatus::Sent)]
}

pub fn payment_status_strategy() -> impl Strategy<Value = PaymentStatus> {
    prop_oneof![
        Just(PaymentStatus::Unpaid),
        Just(PaymentStatus::Partial),
        Just(PaymentStatus::PendingPayment),
        Just(PaymentStatus::Paid),
    ]
}

pub fn reminder_status_strategy() -> impl Strategy<Value = ReminderStatus> {
    prop_oneof![
        Just(ReminderStatus::None),
        Just(ReminderStatus::Reminder1),
        Just(ReminderStatus::Reminder2),
        Just(ReminderStatus::Reminder3),
        Just(ReminderStatus::Reminder4),
        Just(ReminderStatus::ManualFollowup),
    ]
}

/// Strategy for dates spread over 2025 to 2027
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..1095i64).prop_map(|days| {
        add_days(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), days)
    })
}

/// Strategy for any combination of status dimensions, dates and amounts
pub fn invoice_snapshot_strategy() -> impl Strategy<Value = InvoiceSnapshot> {
    (
        send_status_strategy(),
        payment_status_strategy(),
        reminder_status_strategy(),
        date_strategy(),
        0i64..90i64,
        amount_minor_strategy(),
        currency_strategy(),
        0u32..=100u32,
    )
        .prop_map(|(send, payment, reminder, invoice_date, term, total, currency, paid_pct)| {
            let amount_ttc = Decimal::new(total, currency.decimal_places());
            let mut invoice = InvoiceSnapshot::new(
                InvoiceId::new(),
                invoice_date,
                add_days(invoice_date, term),
                amount_ttc,
                currency,
            );
            invoice.send_status = send;
            invoice.payment_status = payment;
            invoice.reminder_status = reminder;
            invoice.paid_amount = Some(amount_ttc * Decimal::from(paid_pct) / Decimal::from(100));
            invoice
        })
}

/// Strategy for invoices the scheduler may remind: sent and not settled
pub fn dunnable_invoice_strategy() -> impl Strategy<Value = InvoiceSnapshot> {
    (
        invoice_snapshot_strategy(),
        prop_oneof![Just(PaymentStatus::Unpaid), Just(PaymentStatus::Partial)],
        prop_oneof![
            Just(ReminderStatus::None),
            Just(ReminderStatus::Reminder1),
            Just(ReminderStatus::Reminder2),
            Just(ReminderStatus::Reminder3),
        ],
    )
        .prop_map(|(mut invoice, payment, reminder)| {
            invoice.send_status = SendStatus::Sent;
            invoice.payment_status = payment;
            invoice.reminder_status = reminder;
            invoice
        })
}

pub fn channel_strategy() -> impl Strategy<Value = ReminderChannel> {
    prop_oneof![Just(ReminderChannel::Email), Just(ReminderChannel::Phone)]
}

/// Strategy for well-formed policies: 0 to 4 steps with strictly increasing delays
pub fn policy_strategy() -> impl Strategy<Value = ReminderStepPolicy> {
    (
        proptest::collection::vec((1u32..30u32, channel_strategy()), 0..=4),
        proptest::option::of(0u32..60u32),
    )
        .prop_map(|(gaps, litigation)| {
            let mut delay = 0u32;
            let steps = gaps
                .into_iter()
                .map(|(gap, channel)| {
                    delay += gap;
                    ReminderStep {
                        delay_days: delay,
                        channel,
                        content_ref: None,
                    }
                })
                .collect();
            ReminderStepPolicy::new(steps, litigation).unwrap()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_policies_are_well_formed(policy in policy_strategy()) {
            prop_assert!(policy.is_well_formed());
            prop_assert!(policy.len() <= 4);
        }

        #[test]
        fn dunnable_invoices_are_sent(invoice in dunnable_invoice_strategy()) {
            prop_assert_eq!(invoice.send_status, SendStatus::Sent);
            prop_assert!(invoice.paid_amount.unwrap_or_default() <= invoice.amount_ttc);
        }
    }
}
