//! Time periods and time units
//!
//! A time period is the summed delta of a duration: either a bare millisecond count or
//! a compound literal such as `1 hour 10 sec 20 msec`. Months and days are kept apart
//! from milliseconds so calendar-aware representations can roll their fields over.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Unit of one (count, unit) pair in a time-period literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl TimeUnit {
    /// Parse a unit keyword as written in time-period literals
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "year" | "years" => Some(Self::Year),
            "month" | "months" => Some(Self::Month),
            "week" | "weeks" => Some(Self::Week),
            "day" | "days" => Some(Self::Day),
            "hour" | "hours" => Some(Self::Hour),
            "minute" | "minutes" | "min" => Some(Self::Minute),
            "second" | "seconds" | "sec" => Some(Self::Second),
            "millisecond" | "milliseconds" | "msec" => Some(Self::Millisecond),
            _ => None,
        }
    }

    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "min",
            Self::Second => "sec",
            Self::Millisecond => "msec",
        }
    }

    /// Length in milliseconds for units below a day
    const fn fixed_millis(&self) -> Option<i64> {
        match self {
            Self::Hour => Some(MILLIS_PER_HOUR),
            Self::Minute => Some(MILLIS_PER_MINUTE),
            Self::Second => Some(MILLIS_PER_SECOND),
            Self::Millisecond => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Summed delta of a duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TimePeriod {
    pub months: i64,
    pub days: i64,
    pub millis: i64,
}

impl TimePeriod {
    pub const ZERO: TimePeriod = TimePeriod {
        months: 0,
        days: 0,
        millis: 0,
    };

    /// A bare millisecond duration
    pub const fn from_millis(millis: i64) -> Self {
        Self {
            months: 0,
            days: 0,
            millis,
        }
    }

    /// One (count, unit) pair; `None` on overflow
    pub fn of(count: i64, unit: TimeUnit) -> Option<Self> {
        let period = match unit {
            TimeUnit::Year => Self {
                months: count.checked_mul(12)?,
                ..Self::ZERO
            },
            TimeUnit::Month => Self {
                months: count,
                ..Self::ZERO
            },
            TimeUnit::Week => Self {
                days: count.checked_mul(7)?,
                ..Self::ZERO
            },
            TimeUnit::Day => Self {
                days: count,
                ..Self::ZERO
            },
            unit => Self::from_millis(count.checked_mul(unit.fixed_millis()?)?),
        };
        Some(period)
    }

    /// One pair with a fractional count.
    ///
    /// Months and years only accept whole counts; fractional weeks and days fall back
    /// to milliseconds. `None` when the count is not representable.
    pub fn of_fractional(count: f64, unit: TimeUnit) -> Option<Self> {
        if !count.is_finite() {
            return None;
        }
        if count.fract() == 0.0 && count.abs() < i64::MAX as f64 {
            return Self::of(count as i64, unit);
        }
        let unit_millis = match unit {
            TimeUnit::Year | TimeUnit::Month => return None,
            TimeUnit::Week => 7 * MILLIS_PER_DAY,
            TimeUnit::Day => MILLIS_PER_DAY,
            unit => unit.fixed_millis()?,
        };
        let millis = (count * unit_millis as f64).round();
        if millis.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Self::from_millis(millis as i64))
    }

    /// Sum (count, unit) pairs left to right into one delta
    pub fn sum<I>(parts: I) -> Option<Self>
    where
        I: IntoIterator<Item = (i64, TimeUnit)>,
    {
        parts
            .into_iter()
            .try_fold(Self::ZERO, |acc, (count, unit)| acc.checked_add(&Self::of(count, unit)?))
    }

    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        Some(Self {
            months: self.months.checked_add(other.months)?,
            days: self.days.checked_add(other.days)?,
            millis: self.millis.checked_add(other.millis)?,
        })
    }

    pub fn checked_neg(&self) -> Option<Self> {
        Some(Self {
            months: self.months.checked_neg()?,
            days: self.days.checked_neg()?,
            millis: self.millis.checked_neg()?,
        })
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Days and milliseconds as one millisecond delta, ignoring months
    pub fn day_time_millis(&self) -> Option<i64> {
        self.days.checked_mul(MILLIS_PER_DAY)?.checked_add(self.millis)
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.months != 0 {
            parts.push(format!("{} month", self.months));
        }
        if self.days != 0 {
            parts.push(format!("{} day", self.days));
        }
        if self.millis != 0 || parts.is_empty() {
            parts.push(format!("{} msec", self.millis));
        }
        f.write_str(&parts.join(" "))
    }
}
