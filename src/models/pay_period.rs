//! Pay period model.
//!
//! This module contains the [`PayPeriod`] value object that bounds every
//! eligibility query, batch submission and paystub, along with the
//! [`boundary`] serde helpers used on the wire.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// An inclusive date window over which hours are accumulated before a run.
///
/// Pay periods in practice are Monday-aligned weeks, but the boundaries are
/// supplied by the caller and only `start <= end` is enforced.
///
/// # Example
///
/// ```
/// use payroll_batch::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
/// )
/// .unwrap();
///
/// assert_eq!(period.length_days(), 7);
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 1, 9).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// First day of the period (inclusive).
    pub start: NaiveDate,
    /// Last day of the period (inclusive).
    pub end: NaiveDate,
}

impl PayPeriod {
    /// Creates a pay period, rejecting inverted windows.
    pub fn new(start: NaiveDate, end: NaiveDate) -> PayrollResult<Self> {
        if start > end {
            return Err(PayrollError::InvalidPayPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the Monday-to-Sunday week containing `date`.
    ///
    /// ```
    /// use payroll_batch::models::PayPeriod;
    /// use chrono::NaiveDate;
    ///
    /// let period = PayPeriod::week_containing(NaiveDate::from_ymd_opt(2025, 1, 9).unwrap());
    /// assert_eq!(period.start, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
    /// assert_eq!(period.end, NaiveDate::from_ymd_opt(2025, 1, 12).unwrap());
    /// ```
    pub fn week_containing(date: NaiveDate) -> Self {
        let offset = i64::from(date.weekday().num_days_from_monday());
        let start = date - Duration::days(offset);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// Validates a period whose fields were filled in directly (e.g. by serde).
    pub fn validate(&self) -> PayrollResult<()> {
        Self::new(self.start, self.end).map(|_| ())
    }

    /// Number of calendar days covered, counting both ends.
    pub fn length_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Checks if a given date falls within this pay period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// The period of the same length immediately after this one.
    pub fn next(&self) -> Self {
        let shift = Duration::days(self.length_days());
        Self {
            start: self.start + shift,
            end: self.end + shift,
        }
    }

    /// The period of the same length immediately before this one.
    pub fn previous(&self) -> Self {
        let shift = Duration::days(self.length_days());
        Self {
            start: self.start - shift,
            end: self.end - shift,
        }
    }
}

/// Parses a pay period boundary sent by a client.
///
/// Accepts a plain ISO date (`2025-01-06`) or an RFC 3339 timestamp
/// (`2025-01-06T00:00:00.000Z`), in which case the UTC calendar date is used.
///
/// ```
/// use payroll_batch::models::parse_boundary;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2025, 1, 6);
/// assert_eq!(parse_boundary("2025-01-06"), expected);
/// assert_eq!(parse_boundary("2025-01-06T00:00:00.000Z"), expected);
/// assert_eq!(parse_boundary("next tuesday"), None);
/// ```
pub fn parse_boundary(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc).date_naive())
}

/// Serde adapter for pay period boundaries on the wire.
///
/// Serializes as a plain ISO date and deserializes anything
/// [`parse_boundary`] accepts.
pub mod boundary {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::parse_boundary;

    /// Serializes a boundary as `YYYY-MM-DD`.
    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    /// Deserializes an ISO date or RFC 3339 timestamp.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_boundary(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid date or timestamp: {raw}")))
    }
}
