//! Dates and year fractions for tenor calculations.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `year_fraction`: ACT/365 Fixed year fraction between two dates
//!
//! Every tenor in the normalisation pipeline uses the same fixed 365-day
//! year with no leap adjustment.
//!
//! # Examples
//!
//! ```
//! use norm_core::types::time::{year_fraction, Date};
//!
//! let obs = Date::from_ymd(2024, 1, 1).unwrap();
//! let maturity = Date::from_ymd(2024, 7, 1).unwrap();
//!
//! // 182 days over a 365-day year
//! let t = year_fraction(obs, maturity);
//! assert!((t - 0.4986).abs() < 0.001);
//! ```

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Number of days in the fixed year used for every tenor.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// Serialises as ISO 8601 (`YYYY-MM-DD`), which is also the format used by
/// the extract files and the store.
///
/// # Examples
///
/// ```
/// use norm_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// assert_eq!(date.year(), 2024);
///
/// let parsed: Date = "2024-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Returns
    /// `Ok(Date)` if the date is valid, `Err(DateError::InvalidDate)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use norm_core::types::time::Date;
    ///
    /// assert!(Date::from_ymd(2024, 2, 29).is_ok());
    /// assert!(Date::from_ymd(2024, 2, 30).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use norm_core::types::time::Date;
    ///
    /// let date = Date::parse("2024-06-15").unwrap();
    /// assert_eq!(date.month(), 6);
    ///
    /// assert!(Date::parse("15/06/2024").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(format!("'{}': {}", s.trim(), e)))
    }

    /// Returns the underlying NaiveDate.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    ///
    /// The result is positive if `self` is after `other`, negative otherwise.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    /// Formats the date as ISO 8601 (YYYY-MM-DD).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// ACT/365 Fixed year fraction from `start` to `end`.
///
/// Unlike a valuation-time helper this never panics: a maturity on or before
/// the observation date yields zero or a negative value, which callers use to
/// reject expired quotes.
///
/// # Examples
///
/// ```
/// use norm_core::types::time::{year_fraction, Date};
///
/// let obs = Date::from_ymd(2024, 1, 1).unwrap();
/// let maturity = Date::from_ymd(2025, 1, 1).unwrap();
///
/// // 366 calendar days, no leap adjustment
/// assert!((year_fraction(obs, maturity) - 366.0 / 365.0).abs() < 1e-12);
/// assert!(year_fraction(maturity, obs) < 0.0);
/// ```
pub fn year_fraction(start: Date, end: Date) -> f64 {
    (end - start) as f64 / DAYS_PER_YEAR
}
