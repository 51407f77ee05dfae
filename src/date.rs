use chrono::{Datelike, Local, Month, NaiveDate, Weekday};
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{all_consuming, map_res},
    sequence::{preceded, tuple},
    IResult,
};
use num_traits::FromPrimitive;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_of_month(month: &Month, year: i32) -> u32 {
    let number = month.number_from_month();
    let first = NaiveDate::from_ymd_opt(year, number, 1);
    let next = if number == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, number + 1, 1)
    };

    match (first, next) {
        (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
        // December of the last year chrono can represent
        _ => match number {
            2 if is_leap_year(year) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        },
    }
}

/// Weekday of the first of `month`, counted from Sunday (Sunday = 0).
pub fn first_weekday_of_month(month: &Month, year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

fn digits(count: usize) -> impl Fn(&str) -> IResult<&str, u32> {
    move |input| {
        map_res(
            take_while_m_n(count, count, |c: char| c.is_ascii_digit()),
            |s: &str| s.parse::<u32>(),
        )(input)
    }
}

fn parse_canonical(input: &str) -> IResult<&str, (u32, u32, u32)> {
    all_consuming(tuple((
        digits(4),
        preceded(char('-'), digits(2)),
        preceded(char('-'), digits(2)),
    )))(input)
}

/// A single calendar day.
///
/// The canonical text form is `YYYY-MM-DD`, which is both what [`fmt::Display`]
/// produces and the only form [`FromStr`] accepts. Months are numbered 1-12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(CalendarDate)
    }

    pub fn today() -> Self {
        CalendarDate(Local::now().date_naive())
    }

    /// Lenient conversion for values handed over by a host.
    ///
    /// Empty and malformed strings both count as "no date"; malformed ones
    /// are logged. Surrounding whitespace makes a string malformed.
    pub fn parse_opt(value: Option<&str>) -> Option<Self> {
        match value {
            None | Some("") => None,
            Some(s) => match s.parse::<CalendarDate>() {
                Ok(date) => Some(date),
                Err(e) => {
                    log::warn!("Ignoring date: {}", e);
                    None
                }
            },
        }
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn month_enum(&self) -> Month {
        Month::from_u32(self.0.month()).unwrap_or(Month::January)
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Moves by `days`, staying put if that would leave chrono's date range.
    pub fn add_days(self, days: i64) -> Self {
        self.0
            .checked_add_signed(chrono::Duration::days(days))
            .map(CalendarDate)
            .unwrap_or(self)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        CalendarDate(date)
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        date.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::new(ErrorKind::InvalidDateString, &format!("'{}'", s));

        let (_, (year, month, day)) = parse_canonical(s).map_err(|_| invalid())?;

        CalendarDate::from_ymd(year as i32, month, day).ok_or_else(invalid)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().expect("valid canonical date")
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_of_month(&Month::February, 2024), 29);
        assert_eq!(days_of_month(&Month::February, 2023), 28);
        assert_eq!(days_of_month(&Month::February, 2000), 29);
        assert_eq!(days_of_month(&Month::February, 1900), 28);
        assert_eq!(days_of_month(&Month::January, 2023), 31);
        assert_eq!(days_of_month(&Month::April, 2023), 30);
        assert_eq!(days_of_month(&Month::December, 2023), 31);
    }

    #[test]
    fn month_length_at_end_of_chrono_range() {
        let last_year = NaiveDate::MAX.year();
        assert_eq!(days_of_month(&Month::December, last_year), 31);
    }

    #[test]
    fn first_weekday_counts_from_sunday() {
        // 2024-09-01 was a Sunday, 2024-11-01 a Friday
        assert_eq!(first_weekday_of_month(&Month::September, 2024), 0);
        assert_eq!(first_weekday_of_month(&Month::November, 2024), 5);
        // 2023-01-01 was a Sunday too, 2023-05-01 a Monday
        assert_eq!(first_weekday_of_month(&Month::May, 2023), 1);
    }

    #[test]
    fn canonical_form_is_zero_padded() {
        let d = CalendarDate::from_ymd(2024, 3, 5).unwrap();
        assert_eq!(d.to_string(), "2024-03-05");
        assert_eq!(date("2024-03-05"), d);
    }

    #[test]
    fn rejects_malformed_strings() {
        for s in &[
            "",
            "2024-1-05",
            "2024-01-5",
            "24-01-05",
            "2024/01/05",
            "2024-01-05 ",
            "2024-01-05T00:00",
            "2024-13-01",
            "2024-02-30",
            "2023-02-29",
            "abcd-ef-gh",
        ] {
            let err = s.parse::<CalendarDate>().unwrap_err();
            assert!(err.is_invalid_date(), "{} should be rejected", s);
        }
    }

    #[test]
    fn accepts_leap_day() {
        assert_eq!(date("2024-02-29").day(), 29);
    }

    #[test]
    fn lenient_parse_treats_garbage_as_absent() {
        assert_eq!(CalendarDate::parse_opt(None), None);
        assert_eq!(CalendarDate::parse_opt(Some("")), None);
        assert_eq!(CalendarDate::parse_opt(Some("tomorrow")), None);
        assert_eq!(CalendarDate::parse_opt(Some(" 2024-11-15 ")), None);
        assert_eq!(CalendarDate::parse_opt(Some("2024-11-15\n")), None);
        assert_eq!(
            CalendarDate::parse_opt(Some("2024-11-15")),
            Some(date("2024-11-15"))
        );
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(date("2024-11-10") < date("2024-11-15"));
        assert!(date("2023-12-31") < date("2024-01-01"));
    }

    #[test]
    fn add_days_crosses_month() {
        assert_eq!(date("2024-02-28").add_days(1), date("2024-02-29"));
        assert_eq!(date("2024-03-01").add_days(-1), date("2024-02-29"));
        assert_eq!(date("2024-12-28").add_days(7), date("2025-01-04"));
    }

    #[test]
    fn serializes_as_canonical_string() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            day: CalendarDate,
        }

        let text = toml::to_string(&Wrapper {
            day: date("2024-11-15"),
        })
        .unwrap();
        assert_eq!(text.trim(), "day = \"2024-11-15\"");

        let back: Wrapper = toml::from_str(&text).unwrap();
        assert_eq!(back.day, date("2024-11-15"));
        assert!(toml::from_str::<Wrapper>("day = \"2024-11-31\"").is_err());
    }
}
