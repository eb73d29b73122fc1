//! Calendar types for ledger reporting
//!
//! Ledger entries carry a calendar date with no time-of-day semantics.
//! Reporting windows are inclusive date ranges, and "today" is resolved in
//! the business timezone of the mill rather than UTC.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Timezone wrapper for the business day
///
/// Wraps chrono_tz::Tz with custom serialization support.
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
        Timezone::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl FromStr for Timezone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s.trim())
            .map(Timezone)
            .map_err(|_| TemporalError::InvalidTimezone(s.to_string()))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Returns the IANA name of the timezone
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Returns the calendar date of a UTC instant in this timezone
    pub fn date_of(&self, utc: DateTime<Utc>) -> NaiveDate {
        utc.with_timezone(&self.0).date_naive()
    }

    /// Returns the current business date
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::Africa::Lagos)
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid date range: from {from} is after to {to}")]
    InvalidRange { from: String, to: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// An inclusive calendar window `[from, to]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `from > to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, TemporalError> {
        if from > to {
            return Err(TemporalError::InvalidRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(Self { from, to })
    }

    /// A range covering a single day
    pub fn single_day(day: NaiveDate) -> Self {
        Self { from: day, to: day }
    }

    /// A range covering all representable history up to `to`
    pub fn through(to: NaiveDate) -> Self {
        Self {
            from: NaiveDate::MIN,
            to,
        }
    }

    /// Builds a range from optional bounds, open ends extend to the calendar limits
    pub fn from_bounds(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Self, TemporalError> {
        Self::new(from.unwrap_or(NaiveDate::MIN), to.unwrap_or(NaiveDate::MAX))
    }

    /// First day of the window
    pub fn start(&self) -> NaiveDate {
        self.from
    }

    /// Last day of the window
    pub fn end(&self) -> NaiveDate {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Returns true if the date falls strictly before the window
    pub fn precedes(&self, date: NaiveDate) -> bool {
        date < self.from
    }

    /// Number of calendar days in the window, inclusive
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

/// Parses an ISO `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<NaiveDate, TemporalError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| TemporalError::InvalidDate(input.to_string()))
}
