//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the dunning engine. The reference
//! invoice is due on 2026-01-01, which keeps reminder thresholds easy to read
//! (a 15-day step lands on 2026-01-16).

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{Currency, InvoiceId, Money, Timezone};
use domain_dunning::{ReminderStep, ReminderStepPolicy};
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Standard invoice total
    pub fn eur_1000() -> Money {
        Money::new(dec!(1000.00), Currency::EUR)
    }

    /// Typical partial payment against `eur_1000`
    pub fn eur_400() -> Money {
        Money::new(dec!(400.00), Currency::EUR)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Invoice issue date (Dec 1, 2025)
    pub fn invoice_date() -> NaiveDate {
        date(2025, 12, 1)
    }

    /// Reference due date (Jan 1, 2026)
    pub fn due_date() -> NaiveDate {
        date(2026, 1, 1)
    }

    /// Day the first 15-day reminder becomes due
    pub fn first_reminder_day() -> NaiveDate {
        date(2026, 1, 16)
    }

    /// Morning instant on a given date, UTC
    pub fn morning_of(day: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&day.and_hms_opt(9, 0, 0).unwrap())
    }

    pub fn paris() -> Timezone {
        "Europe/Paris".parse().unwrap()
    }

    pub fn utc() -> Timezone {
        Timezone::default()
    }
}

/// Fixture for reminder step policies
pub struct PolicyFixtures;

impl PolicyFixtures {
    /// Email at 15 and 30 days, phone at 45, litigation 15 days later
    pub fn standard() -> ReminderStepPolicy {
        ReminderStepPolicy::new(
            vec![
                ReminderStep::email(15).with_content("reminder-1"),
                ReminderStep::email(30).with_content("reminder-2"),
                ReminderStep::phone(45).with_content("call-script"),
            ],
            Some(15),
        )
        .unwrap()
    }

    /// All four numbered steps configured
    pub fn four_steps() -> ReminderStepPolicy {
        ReminderStepPolicy::new(
            vec![
                ReminderStep::email(7),
                ReminderStep::email(14),
                ReminderStep::phone(21),
                ReminderStep::email(28),
            ],
            None,
        )
        .unwrap()
    }

    /// No automated steps
    pub fn manual_only() -> ReminderStepPolicy {
        ReminderStepPolicy::manual_only(Some(30))
    }
}

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    pub fn invoice_id() -> InvoiceId {
        InvoiceId::new_v7()
    }
}

/// Shorthand for a calendar date in tests
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_policy_shape() {
        let policy = PolicyFixtures::standard();
        assert_eq!(policy.len(), 3);
        assert_eq!(policy.litigation_delay_days(), Some(15));
    }

    #[test]
    fn test_reference_dates() {
        assert!(TemporalFixtures::invoice_date() < TemporalFixtures::due_date());
        assert_eq!(
            TemporalFixtures::first_reminder_day(),
            core_kernel::temporal::add_days(TemporalFixtures::due_date(), 15)
        );
    }
}
