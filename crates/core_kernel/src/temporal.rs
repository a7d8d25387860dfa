//! Calendar date arithmetic
//!
//! Invoice due dates are calendar dates with no time component. Everything in
//! this module is a pure function of its arguments: there is no ambient clock,
//! so "now" always arrives as a parameter and real and simulated evaluations
//! share one code path.

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// ISO 8601 calendar date format (`YYYY-MM-DD`)
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid ISO date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

/// Timezone of an organization
///
/// Wraps chrono_tz::Tz with serialization as an IANA name. Used to turn an
/// instant into the local calendar date the dunning rules are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for Timezone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s)
            .map(Timezone)
            .map_err(|_| TemporalError::UnknownTimezone(s.to_string()))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Returns the calendar date of `instant` in this timezone
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.0).date_naive()
    }

    /// Gets the start of day (00:00) in this timezone as UTC
    ///
    /// Falls back to UTC midnight when local midnight does not exist (DST gap).
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(chrono::NaiveTime::MIN);
        midnight
            .and_local_timezone(self.0)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(|| midnight.and_utc())
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

/// Adds a (possibly negative) number of days to a date
///
/// Saturates at the bounds of `NaiveDate` instead of overflowing.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };

    shifted.unwrap_or(if days >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

/// Whole days from `from` to `to` (negative when `to` is earlier)
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Formats a date as `YYYY-MM-DD`
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` date
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, TemporalError> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT)
        .map_err(|_| TemporalError::InvalidDate(value.to_string()))
}
