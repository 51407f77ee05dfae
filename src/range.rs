use serde::{Deserialize, Serialize};
use std::fmt;

use crate::date::CalendarDate;

/// How a single day relates to the selected range, used to pick a cell style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayRole {
    None,
    RangeStart,
    RangeEnd,
    /// Start and end of a single-day range at once.
    SingleDay,
    InRange,
}

impl DayRole {
    pub fn is_range_start(&self) -> bool {
        matches!(self, DayRole::RangeStart | DayRole::SingleDay)
    }

    pub fn is_range_end(&self) -> bool {
        matches!(self, DayRole::RangeEnd | DayRole::SingleDay)
    }

    pub fn is_in_range(&self) -> bool {
        !matches!(self, DayRole::None)
    }
}

/// An inclusive interval of days with optional endpoints.
///
/// Whenever both endpoints are present `start <= end` holds. A range is a
/// plain value; picking a day produces a new range instead of changing this one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDateRange")]
pub struct DateRange {
    start: Option<CalendarDate>,
    end: Option<CalendarDate>,
}

/// Endpoints as read from a serialized source, before normalization.
#[derive(Deserialize)]
struct RawDateRange {
    #[serde(default)]
    start: Option<CalendarDate>,
    #[serde(default)]
    end: Option<CalendarDate>,
}

impl From<RawDateRange> for DateRange {
    fn from(raw: RawDateRange) -> Self {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn empty() -> Self {
        DateRange::default()
    }

    pub fn starting_at(start: CalendarDate) -> Self {
        DateRange {
            start: Some(start),
            end: None,
        }
    }

    /// Builds a complete range, swapping the endpoints if they are reversed.
    pub fn between(a: CalendarDate, b: CalendarDate) -> Self {
        let (start, end) = if b < a { (b, a) } else { (a, b) };
        DateRange {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn new(start: Option<CalendarDate>, end: Option<CalendarDate>) -> Self {
        match (start, end) {
            (Some(start), Some(end)) => DateRange::between(start, end),
            (Some(start), None) => DateRange::starting_at(start),
            (None, Some(end)) => {
                log::debug!("Dropping range end {} without a start", end);
                DateRange::empty()
            }
            (None, None) => DateRange::empty(),
        }
    }

    /// Reads a range from the string values a host hands over.
    ///
    /// Invalid strings are treated as absent.
    pub fn from_props(start: Option<&str>, end: Option<&str>) -> Self {
        DateRange::new(CalendarDate::parse_opt(start), CalendarDate::parse_opt(end))
    }

    /// Canonical strings for the host, with `""` for a missing endpoint.
    pub fn to_props(&self) -> (String, String) {
        (
            self.start.map(|d| d.to_string()).unwrap_or_default(),
            self.end.map(|d| d.to_string()).unwrap_or_default(),
        )
    }

    pub fn start(&self) -> Option<CalendarDate> {
        self.start
    }

    pub fn end(&self) -> Option<CalendarDate> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// The range resulting from a click on `day`.
    ///
    /// A click without a start or after a complete range begins a new
    /// selection. A click while only the start is set completes the range,
    /// ordering the two days; clicking the start itself yields a single day.
    pub fn pick(&self, day: CalendarDate) -> DateRange {
        match self.start {
            Some(start) if !self.is_complete() => {
                if day < start {
                    DateRange::between(day, start)
                } else if day == start {
                    DateRange::between(day, day)
                } else {
                    DateRange::between(start, day)
                }
            }
            _ => DateRange::starting_at(day),
        }
    }

    pub fn classify(&self, day: CalendarDate) -> DayRole {
        let is_start = self.start == Some(day);
        let is_end = self.end == Some(day);

        match (is_start, is_end) {
            (true, true) => DayRole::SingleDay,
            (true, false) => DayRole::RangeStart,
            (false, true) => DayRole::RangeEnd,
            (false, false) => match (self.start, self.end) {
                (Some(start), Some(end)) if start <= day && day <= end => DayRole::InRange,
                _ => DayRole::None,
            },
        }
    }

    /// Number of days covered by a complete range, both ends included.
    pub fn num_days(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(
                end.naive()
                    .signed_duration_since(start.naive())
                    .num_days()
                    + 1,
            ),
            _ => None,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = self.to_props();
        write!(f, "{} {}", start, end)
    }
}
