use std::str::FromStr;

use chrono::{DateTime, Datelike, Months, TimeDelta, TimeZone, Utc};

use crate::{
    error::{BoshStatsError, Result},
    types::EventsFilter,
};

/// Inclusive UTC bounds of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CalendarWindow {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let start = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()?;
        let end = start.checked_add_months(Months::new(1))? - TimeDelta::seconds(1);
        Some(Self { start, end })
    }

    /// Parse `YYYY/MM`.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| BoshStatsError::InvalidWindow {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (year, month) = input
            .trim()
            .split_once('/')
            .ok_or_else(|| invalid("expected YYYY/MM"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| invalid("year is not an integer"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| invalid("month is not an integer"))?;
        if !(1..=12).contains(&month) {
            return Err(invalid("month must be between 1 and 12"));
        }

        Self::new(year, month).ok_or_else(|| invalid("date out of range"))
    }

    /// First page filter for this month.
    pub fn filter(&self) -> EventsFilter {
        EventsFilter {
            before: Some(self.end.timestamp()),
            after: Some(self.start.timestamp()),
            before_id: None,
        }
    }

    /// Human label such as `Nov 2015`.
    pub fn label(&self) -> String {
        self.start.format("%b %Y").to_string()
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn month(&self) -> u32 {
        self.start.month()
    }
}

impl FromStr for CalendarWindow {
    type Err = BoshStatsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
