//! Calendar handling for the ledger
//!
//! Interest settles per calendar month, and a month only exists relative to a
//! timezone: a transaction stamped 2024-02-29T23:00:00Z belongs to March in
//! Asia/Shanghai. This module provides the timezone wrapper and the
//! [`SettlementMonth`] value the scheduler works in.

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors related to calendar operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("invalid settlement month: {0:?}")]
    InvalidMonth(String),

    #[error("unknown timezone: {0:?}")]
    UnknownTimezone(String),
}

/// IANA timezone wrapper with string serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Returns the IANA zone name
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Converts a UTC instant to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Gets the start of day (00:00:00) in this timezone as UTC
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid wall-clock time");
        match midnight.and_local_timezone(self.0) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
            // Midnight can fall inside a DST gap; settle on the first
            // following hour that exists.
            LocalResult::None => (midnight + chrono::Duration::hours(1))
                .and_local_timezone(self.0)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| Utc.from_utc_datetime(&midnight)),
        }
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
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

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid timezone: {}", s)))
    }
}

/// A calendar month in which interest settles
///
/// Displays as `YYYY-MM`; serializes as a `YYYY-MM-01` date string, the
/// format interest rows are tagged with. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SettlementMonth {
    year: i32,
    month: u32,
}

impl SettlementMonth {
    /// Creates a settlement month, validating the month number
    pub fn new(year: i32, month: u32) -> Result<Self, TemporalError> {
        if !(1..=12).contains(&month) {
            return Err(TemporalError::InvalidMonth(format!("{}-{}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// The calendar month a UTC instant falls in, in the given timezone
    pub fn of_instant(instant: DateTime<Utc>, tz: &Timezone) -> Self {
        let local = tz.to_local(instant);
        Self {
            year: local.year(),
            month: local.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following calendar month
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding calendar month
    pub fn pred(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The first instant of this month in the given timezone, as UTC
    pub fn first_instant(&self, tz: &Timezone) -> DateTime<Utc> {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("validated month always has a first day");
        tz.start_of_day(first)
    }

    /// The `YYYY-MM-01` tag carried by interest rows
    pub fn as_tag(&self) -> String {
        format!("{:04}-{:02}-01", self.year, self.month)
    }
}

impl fmt::Display for SettlementMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for SettlementMonth {
    type Err = TemporalError;

    /// Parses `YYYY-MM`, tolerating a trailing day component (`YYYY-MM-01`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TemporalError::InvalidMonth(s.to_string());
        let mut parts = s.splitn(3, '-');
        let year = parts
            .next()
            .and_then(|p| p.parse::<i32>().ok())
            .ok_or_else(invalid)?;
        let month = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for SettlementMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.as_tag())
    }
}

impl<'de> Deserialize<'de> for SettlementMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid settlement month: {}", s)))
    }
}
