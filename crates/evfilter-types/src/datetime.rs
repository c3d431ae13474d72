//! Date-time representations
//!
//! Five representations can receive date-time arithmetic:
//!
//! | Repr          | Carried as                       | Arithmetic                 |
//! |---------------|----------------------------------|----------------------------|
//! | `EpochMillis` | `Value::Long`                    | raw integer addition       |
//! | `Date`        | `DateTimeValue::Date` (UTC)      | raw integer addition       |
//! | `Calendar`    | epoch millis + fixed offset      | calendar fields roll over  |
//! | `Zoned`       | `DateTime<FixedOffset>`          | calendar fields roll over  |
//! | `Local`       | `NaiveDateTime`, no zone         | calendar fields roll over  |
//!
//! Offsets are fixed, so no value can span a daylight-saving transition.

use crate::Value;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Default timestamp text format, e.g. `2002-05-30T09:00:00.000`
pub const DEFAULT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

const PARSE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// The five date representations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateRepr {
    EpochMillis,
    Date,
    Calendar,
    Zoned,
    Local,
}

impl DateRepr {
    pub const ALL: [DateRepr; 5] = [
        DateRepr::EpochMillis,
        DateRepr::Date,
        DateRepr::Calendar,
        DateRepr::Zoned,
        DateRepr::Local,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::EpochMillis => "Long",
            Self::Date => "Date",
            Self::Calendar => "Calendar",
            Self::Zoned => "ZonedDateTime",
            Self::Local => "LocalDateTime",
        }
    }

    /// Representations whose day/month/year fields roll over on arithmetic
    pub const fn is_calendar_aware(&self) -> bool {
        matches!(self, Self::Calendar | Self::Zoned | Self::Local)
    }

    /// Parse a representation keyword (`msec`, `util`, `cal`, `zdt`, `ldt`, ...)
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "msec" | "long" | "epoch" | "epochmillis" => Some(Self::EpochMillis),
            "util" | "date" => Some(Self::Date),
            "cal" | "calendar" => Some(Self::Calendar),
            "zdt" | "zoned" | "zoneddatetime" => Some(Self::Zoned),
            "ldt" | "local" | "localdatetime" => Some(Self::Local),
            _ => None,
        }
    }
}

impl fmt::Display for DateRepr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Legacy calendar object: an instant plus the offset its fields are computed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDateTime {
    millis: i64,
    offset_seconds: i32,
}

impl CalendarDateTime {
    pub fn new(millis: i64, offset: FixedOffset) -> Self {
        Self {
            millis,
            offset_seconds: offset.local_minus_utc(),
        }
    }

    /// Build a calendar from wall-clock fields in the given offset
    pub fn from_local(local: NaiveDateTime, offset: FixedOffset) -> Option<Self> {
        let instant = local.and_local_timezone(offset).single()?;
        Some(Self::new(instant.timestamp_millis(), offset))
    }

    pub fn time_in_millis(&self) -> i64 {
        self.millis
    }

    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.offset_seconds).unwrap_or_else(|| Utc.fix())
    }

    /// Wall-clock fields of this calendar
    pub fn to_local(&self) -> Option<NaiveDateTime> {
        let instant = DateTime::from_timestamp_millis(self.millis)?;
        Some(instant.with_timezone(&self.offset()).naive_local())
    }
}

/// Date-time value in one of the non-integer representations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "repr", content = "value")]
pub enum DateTimeValue {
    /// Boxed date object: an instant without field semantics
    Date(DateTime<Utc>),
    /// Legacy calendar object
    Calendar(CalendarDateTime),
    /// Zoned date-time carrying its offset
    Zoned(DateTime<FixedOffset>),
    /// Zone-less local date-time
    Local(NaiveDateTime),
}

impl DateTimeValue {
    pub fn repr(&self) -> DateRepr {
        match self {
            Self::Date(_) => DateRepr::Date,
            Self::Calendar(_) => DateRepr::Calendar,
            Self::Zoned(_) => DateRepr::Zoned,
            Self::Local(_) => DateRepr::Local,
        }
    }

    /// Epoch milliseconds of this value; local values are placed in `zone`
    pub fn epoch_millis(&self, zone: FixedOffset) -> Option<i64> {
        match self {
            Self::Date(dt) => Some(dt.timestamp_millis()),
            Self::Calendar(cal) => Some(cal.time_in_millis()),
            Self::Zoned(dt) => Some(dt.timestamp_millis()),
            Self::Local(local) => local
                .and_local_timezone(zone)
                .single()
                .map(|dt| dt.timestamp_millis()),
        }
    }

    /// Compare two date-time values.
    ///
    /// Instant-based representations compare by instant with each other; local values
    /// only compare with local values. Returns `None` for incomparable pairs.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Local(a), Self::Local(b)) => Some(a.cmp(b)),
            (Self::Local(_), _) | (_, Self::Local(_)) => None,
            _ => {
                let utc = Utc.fix();
                let a = self.epoch_millis(utc)?;
                let b = other.epoch_millis(utc)?;
                Some(a.cmp(&b))
            }
        }
    }

    /// Convert wall-clock fields into the requested representation.
    ///
    /// `zone` supplies the offset for every representation that needs one; the
    /// result for `EpochMillis` is a `Value::Long`.
    pub fn coerce(local: NaiveDateTime, repr: DateRepr, zone: FixedOffset) -> Option<Value> {
        let zoned = || local.and_local_timezone(zone).single();
        let value = match repr {
            DateRepr::EpochMillis => Value::Long(zoned()?.timestamp_millis()),
            DateRepr::Date => Value::DateTime(Self::Date(zoned()?.with_timezone(&Utc))),
            DateRepr::Calendar => {
                Value::DateTime(Self::Calendar(CalendarDateTime::from_local(local, zone)?))
            }
            DateRepr::Zoned => Value::DateTime(Self::Zoned(zoned()?)),
            DateRepr::Local => Value::DateTime(Self::Local(local)),
        };
        Some(value)
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            Self::Calendar(cal) => match cal.to_local() {
                Some(local) => write!(f, "{}{}", local.format(DEFAULT_FORMAT), cal.offset()),
                None => write!(f, "calendar({}ms)", cal.time_in_millis()),
            },
            Self::Zoned(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3f%:z")),
            Self::Local(local) => write!(f, "{}", local.format(DEFAULT_FORMAT)),
        }
    }
}

/// Parse wall-clock text such as `2002-05-30T09:00:00.000`
pub fn parse_local(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    PARSE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// Parse the default timestamp format into epoch milliseconds in `zone`
pub fn parse_default_msec(text: &str, zone: FixedOffset) -> Option<i64> {
    let local = parse_local(text)?;
    local
        .and_local_timezone(zone)
        .single()
        .map(|dt| dt.timestamp_millis())
}
