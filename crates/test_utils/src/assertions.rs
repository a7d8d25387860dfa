//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use chrono::NaiveDate;
use core_kernel::Money;
use domain_dunning::{
    DunningAction, InvoiceSnapshot, MainStatus, PlannedReminder, ReminderChannel, ReminderStatus,
    StatusReport,
};
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts the main status of a report, printing the whole report on failure
pub fn assert_main_status(report: &StatusReport, expected: MainStatus) {
    assert_eq!(
        report.main_status, expected,
        "Unexpected main status, report: {:?}",
        report
    );
}

/// Asserts that the report is overdue by exactly `days`
pub fn assert_overdue_by(report: &StatusReport, days: i64) {
    assert!(report.is_overdue, "Expected overdue invoice, report: {:?}", report);
    assert_eq!(
        report.days_past_due, days,
        "Unexpected days past due, report: {:?}",
        report
    );
}

/// Asserts that a reminder targets the given step, channel and due date
pub fn assert_reminder(
    reminder: &PlannedReminder,
    step: ReminderStatus,
    channel: ReminderChannel,
    due_on: NaiveDate,
) {
    assert_eq!(reminder.reminder_status, step, "Wrong step: {:?}", reminder);
    assert_eq!(reminder.reminder_type, channel, "Wrong channel: {:?}", reminder);
    assert_eq!(reminder.due_on, due_on, "Wrong due date: {:?}", reminder);
}

/// Asserts that planned actions never mix a reminder with an escalation
pub fn assert_single_action_kind(actions: &[DunningAction]) {
    let escalations = actions
        .iter()
        .filter(|a| matches!(a, DunningAction::EscalateToManualFollowup { .. }))
        .count();

    assert!(
        actions.len() <= 1 && escalations <= 1,
        "Expected at most one action, got {:?}",
        actions
    );
}

/// Asserts that two snapshots differ only in their due date
pub fn assert_same_except_due_date(before: &InvoiceSnapshot, after: &InvoiceSnapshot) {
    let mut normalized = after.clone();
    normalized.due_date = before.due_date;
    assert_eq!(&normalized, before, "Snapshots differ beyond the due date");
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_approx_eq() {
        let a = Money::new(dec!(100.001), Currency::EUR);
        let b = Money::new(dec!(100.002), Currency::EUR);
        assert_money_approx_eq(&a, &b, dec!(0.01));
    }

    #[test]
    #[should_panic(expected = "Currency mismatch")]
    fn test_money_approx_eq_currency_mismatch() {
        let a = Money::new(dec!(100), Currency::EUR);
        let b = Money::new(dec!(100), Currency::USD);
        assert_money_approx_eq(&a, &b, dec!(0.01));
    }

    #[test]
    #[should_panic(expected = "Expected at most one action")]
    fn test_single_action_kind_rejects_two_actions() {
        let invoice_id = core_kernel::InvoiceId::new();
        let on = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let actions = vec![
            DunningAction::EscalateToManualFollowup { invoice_id, escalated_on: on },
            DunningAction::EscalateToManualFollowup { invoice_id, escalated_on: on },
        ];
        assert_single_action_kind(&actions);
    }
}
