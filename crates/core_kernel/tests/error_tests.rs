//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::money::MoneyError;
use core_kernel::temporal::{parse_iso_date, TemporalError};

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_configuration() {
    let error = CoreError::configuration("default_policy: delays not increasing");

    match error {
        CoreError::Configuration(msg) => assert!(msg.starts_with("default_policy")),
        _ => panic!("Expected Configuration error"),
    }
}

#[test]
fn test_core_error_from_money_error() {
    let money_error = MoneyError::CurrencyMismatch("EUR".to_string(), "USD".to_string());
    let core_error: CoreError = money_error.into();

    assert!(matches!(core_error, CoreError::Money(_)));
}

#[test]
fn test_core_error_from_temporal_error() {
    fn parse(value: &str) -> Result<chrono::NaiveDate, CoreError> {
        Ok(parse_iso_date(value)?)
    }

    assert!(matches!(
        parse("2026-13-01"),
        Err(CoreError::Temporal(TemporalError::InvalidDate(_)))
    ));
}

#[test]
fn test_core_error_display() {
    let error = CoreError::validation("Test error");
    assert!(error.to_string().contains("Validation error"));
}
