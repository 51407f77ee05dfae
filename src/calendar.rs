use chrono::{Datelike, Month, NaiveDate};
use num_traits::FromPrimitive;
use std::ops::{Add, Sub};

use crate::date::{days_of_month, first_weekday_of_month, CalendarDate};
use crate::range::DateRange;

/// A month of a specific year, i.e. what the calendar currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthIndex {
    index: Month,
    year: i32,
}

impl MonthIndex {
    pub fn new(index: Month, year: i32) -> Self {
        MonthIndex { index, year }
    }

    pub fn month(&self) -> Month {
        self.index
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn first_day(&self) -> CalendarDate {
        CalendarDate::from_ymd(self.year, self.index.number_from_month(), 1)
            .unwrap_or_else(|| NaiveDate::MAX.into())
    }

    pub fn num_days(&self) -> u32 {
        days_of_month(&self.index, self.year)
    }

    pub fn next(&self) -> Self {
        *self + 1
    }

    pub fn prev(&self) -> Self {
        *self - 1
    }

    fn absolute(&self) -> i64 {
        self.year as i64 * 12 + self.index.number_from_month() as i64 - 1
    }

    fn from_absolute(months: i64) -> Self {
        let first = NaiveDate::MIN.year() as i64 * 12;
        let last = NaiveDate::MAX.year() as i64 * 12 + 11;
        let months = months.clamp(first, last);

        MonthIndex {
            index: Month::from_i64(months.rem_euclid(12) + 1).unwrap_or(Month::January),
            year: months.div_euclid(12) as i32,
        }
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: &MonthIndex) -> i32 {
        (other.absolute() - self.absolute()) as i32
    }
}

impl From<NaiveDate> for MonthIndex {
    fn from(date: NaiveDate) -> Self {
        MonthIndex::new(
            Month::from_u32(date.month()).unwrap_or(Month::January),
            date.year(),
        )
    }
}

impl From<CalendarDate> for MonthIndex {
    fn from(date: CalendarDate) -> Self {
        MonthIndex::new(date.month_enum(), date.year())
    }
}

impl Add<i32> for MonthIndex {
    type Output = MonthIndex;
    fn add(self, rhs: i32) -> Self::Output {
        MonthIndex::from_absolute(self.absolute() + rhs as i64)
    }
}

impl Sub<i32> for MonthIndex {
    type Output = MonthIndex;
    fn sub(self, rhs: i32) -> Self::Output {
        MonthIndex::from_absolute(self.absolute() - rhs as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    Empty,
    Day(CalendarDate),
}

impl GridCell {
    pub fn date(&self) -> Option<CalendarDate> {
        match self {
            GridCell::Empty => None,
            GridCell::Day(date) => Some(*date),
        }
    }
}

/// The cells of one month laid out in complete Sunday-first weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    month: MonthIndex,
    offset: u32,
    num_days: u32,
}

impl MonthGrid {
    pub const COLUMNS: usize = 7;

    pub fn new(month: MonthIndex) -> Self {
        MonthGrid {
            month,
            offset: first_weekday_of_month(&month.month(), month.year()),
            num_days: month.num_days(),
        }
    }

    pub fn month(&self) -> MonthIndex {
        self.month
    }

    /// Number of blank cells in front of the first day.
    pub fn offset(&self) -> usize {
        self.offset as usize
    }

    pub fn num_days(&self) -> usize {
        self.num_days as usize
    }

    pub fn len(&self) -> usize {
        let used = self.offset() + self.num_days();
        ((used + Self::COLUMNS - 1) / Self::COLUMNS) * Self::COLUMNS
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cells(&self) -> GridCells {
        GridCells {
            grid: *self,
            pos: 0,
        }
    }

    pub fn weeks(&self) -> Vec<Vec<GridCell>> {
        self.cells()
            .collect::<Vec<_>>()
            .chunks(Self::COLUMNS)
            .map(|week| week.to_vec())
            .collect()
    }

    /// Grid position of `date`, if it belongs to this month.
    pub fn position_of(&self, date: CalendarDate) -> Option<usize> {
        if MonthIndex::from(date) == self.month {
            Some(self.offset() + date.day() as usize - 1)
        } else {
            None
        }
    }
}

impl IntoIterator for MonthGrid {
    type Item = GridCell;
    type IntoIter = GridCells;

    fn into_iter(self) -> Self::IntoIter {
        self.cells()
    }
}

pub struct GridCells {
    grid: MonthGrid,
    pos: usize,
}

impl Iterator for GridCells {
    type Item = GridCell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.grid.len() {
            return None;
        }

        let pos = self.pos;
        self.pos += 1;

        let day = pos as i64 - self.grid.offset() as i64 + 1;
        if day < 1 || day > self.grid.num_days() as i64 {
            Some(GridCell::Empty)
        } else {
            Some(GridCell::Day(self.grid.month.first_day().add_days(day - 1)))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.grid.len().saturating_sub(self.pos);
        (left, Some(left))
    }
}

impl ExactSizeIterator for GridCells {}

/// Month view of a date range picker.
///
/// Only the displayed month is kept here. The selected range belongs to the
/// host, which passes it in and gets the updated range back.
#[derive(Debug, Clone)]
pub struct RangeCalendar {
    view: MonthIndex,
}

impl RangeCalendar {
    pub fn new(initial_start: Option<CalendarDate>) -> Self {
        RangeCalendar::with_today(initial_start, CalendarDate::today())
    }

    pub fn with_today(initial_start: Option<CalendarDate>, today: CalendarDate) -> Self {
        RangeCalendar {
            view: MonthIndex::from(initial_start.unwrap_or(today)),
        }
    }

    pub fn from_props(start: Option<&str>) -> Self {
        RangeCalendar::new(CalendarDate::parse_opt(start))
    }

    pub fn view(&self) -> MonthIndex {
        self.view
    }

    pub fn navigate(&mut self, delta_months: i32) {
        self.view = self.view + delta_months;
        log::debug!(
            "Showing {} {}",
            self.view.month().name(),
            self.view.year()
        );
    }

    /// Brings the month containing `date` into view.
    pub fn show(&mut self, date: CalendarDate) {
        let delta = self.view.months_until(&MonthIndex::from(date));
        if delta != 0 {
            self.navigate(delta);
        }
    }

    pub fn grid(&self) -> MonthGrid {
        MonthGrid::new(self.view)
    }

    /// Computes the range after a click on `day` and reports it to the host
    /// through `on_change` as canonical strings.
    pub fn pick<F>(&self, day: CalendarDate, current: &DateRange, on_change: F) -> DateRange
    where
        F: FnOnce(&str, &str),
    {
        let next = current.pick(day);
        let (start, end) = next.to_props();
        log::debug!("Picked {}: '{}' - '{}'", day, start, end);
        on_change(&start, &end);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::DayRole;

    fn date(s: &str) -> CalendarDate {
        s.parse().expect("valid canonical date")
    }

    fn all_months() -> impl Iterator<Item = MonthIndex> {
        (1900..=2100).flat_map(|year| {
            (1..=12).map(move |m| MonthIndex::new(Month::from_u32(m).unwrap(), year))
        })
    }

    #[test]
    fn grid_is_made_of_complete_weeks() {
        for month in all_months() {
            let grid = MonthGrid::new(month);
            let cells: Vec<GridCell> = grid.cells().collect();

            assert!(!cells.is_empty());
            assert_eq!(cells.len() % 7, 0, "{:?}", month);
            assert_eq!(cells.len(), grid.len());
            // no week consists only of padding
            assert!(cells.len() - (grid.offset() + grid.num_days()) < 7);

            let days = cells.iter().filter(|c| c.date().is_some()).count();
            assert_eq!(days as u32, days_of_month(&month.month(), month.year()));
        }
    }

    #[test]
    fn day_counts() {
        let count = |m: Month, y: i32| {
            MonthGrid::new(MonthIndex::new(m, y))
                .cells()
                .filter_map(|c| c.date())
                .count()
        };
        assert_eq!(count(Month::February, 2024), 29);
        assert_eq!(count(Month::February, 2023), 28);
        assert_eq!(count(Month::January, 2023), 31);
        assert_eq!(count(Month::April, 2023), 30);
    }

    #[test]
    fn first_day_sits_in_its_weekday_column() {
        for month in all_months() {
            let grid = MonthGrid::new(month);
            let first = grid
                .cells()
                .position(|c| c.date().is_some())
                .expect("month has days");

            let weekday = month.first_day().weekday().num_days_from_sunday() as usize;
            assert_eq!(first % 7, weekday, "{:?}", month);
            assert_eq!(grid.cells().nth(first), Some(GridCell::Day(month.first_day())));
        }
    }

    #[test]
    fn days_are_consecutive() {
        let grid = MonthGrid::new(MonthIndex::new(Month::November, 2024));
        let days: Vec<CalendarDate> = grid.into_iter().filter_map(|c| c.date()).collect();

        assert_eq!(days.first(), Some(&date("2024-11-01")));
        assert_eq!(days.last(), Some(&date("2024-11-30")));
        assert!(days.windows(2).all(|w| w[0].add_days(1) == w[1]));
    }

    #[test]
    fn november_2024_layout() {
        // Nov 1st 2024 is a Friday: five leading blanks, 35 cells in total
        let grid = MonthGrid::new(MonthIndex::new(Month::November, 2024));
        let weeks = grid.weeks();

        assert_eq!(grid.offset(), 5);
        assert_eq!(weeks.len(), 5);
        assert!(weeks[0][..5].iter().all(|c| *c == GridCell::Empty));
        assert_eq!(weeks[0][5], GridCell::Day(date("2024-11-01")));
        assert_eq!(weeks[4][6], GridCell::Day(date("2024-11-30")));
        assert_eq!(grid.position_of(date("2024-11-30")), Some(34));
        assert_eq!(grid.position_of(date("2024-12-01")), None);
    }

    #[test]
    fn february_starting_on_sunday_fills_four_rows() {
        // 2015-02-01 was a Sunday and 2015 was no leap year
        let grid = MonthGrid::new(MonthIndex::new(Month::February, 2015));
        assert_eq!(grid.offset(), 0);
        assert_eq!(grid.len(), 28);
    }

    #[test]
    fn grid_iteration_is_restartable() {
        let grid = MonthGrid::new(MonthIndex::new(Month::March, 2024));
        let first: Vec<GridCell> = grid.cells().collect();
        let second: Vec<GridCell> = grid.cells().collect();
        assert_eq!(first, second);
        assert_eq!(grid.cells().len(), first.len());
    }

    #[test]
    fn navigation_rolls_over_years() {
        let dec = MonthIndex::new(Month::December, 2024);
        assert_eq!(dec.next(), MonthIndex::new(Month::January, 2025));

        let jan = MonthIndex::new(Month::January, 2024);
        assert_eq!(jan.prev(), MonthIndex::new(Month::December, 2023));

        assert_eq!(jan + 12, MonthIndex::new(Month::January, 2025));
        assert_eq!(jan - 13, MonthIndex::new(Month::December, 2022));
        assert_eq!(jan + -1, jan.prev());
        assert_eq!(jan + 35, MonthIndex::new(Month::December, 2026));
    }

    #[test]
    fn navigate_is_invertible() {
        for month in all_months().step_by(7) {
            for delta in &[1, 5, 11, 12, 13, 100, -1, -12, -250] {
                let mut cal = RangeCalendar::with_today(Some(month.first_day()), date("2024-01-01"));
                cal.navigate(*delta);
                cal.navigate(-*delta);
                assert_eq!(cal.view(), month);
            }
        }
    }

    #[test]
    fn navigate_by_a_year_keeps_month() {
        let mut cal = RangeCalendar::with_today(Some(date("2024-11-15")), date("2020-01-01"));
        cal.navigate(12);
        assert_eq!(cal.view(), MonthIndex::new(Month::November, 2025));
    }

    #[test]
    fn navigation_saturates_at_chrono_limits() {
        let last = MonthIndex::new(Month::December, NaiveDate::MAX.year());
        assert_eq!(last + 1, last);
        assert_eq!(last.num_days(), 31);
    }

    #[test]
    fn initial_view_follows_range_start() {
        let today = date("2026-10-18");

        let cal = RangeCalendar::with_today(Some(date("2024-11-15")), today);
        assert_eq!(cal.view(), MonthIndex::new(Month::November, 2024));
        assert_eq!(cal.view().first_day(), date("2024-11-01"));

        let cal = RangeCalendar::with_today(None, today);
        assert_eq!(cal.view(), MonthIndex::new(Month::October, 2026));
    }

    #[test]
    fn invalid_prop_falls_back_to_current_month() {
        let cal = RangeCalendar::from_props(Some("2024-02-30"));
        assert_eq!(cal.view(), MonthIndex::from(CalendarDate::today()));
    }

    #[test]
    fn show_jumps_to_month() {
        let mut cal = RangeCalendar::with_today(None, date("2024-11-15"));
        cal.show(date("2023-02-10"));
        assert_eq!(cal.view(), MonthIndex::new(Month::February, 2023));
    }

    #[test]
    fn pick_reports_canonical_strings() {
        let cal = RangeCalendar::with_today(None, date("2024-11-01"));
        let mut emitted = Vec::new();

        let range = cal.pick(date("2024-11-15"), &DateRange::empty(), |s, e| {
            emitted.push((s.to_owned(), e.to_owned()))
        });
        let range = cal.pick(date("2024-11-10"), &range, |s, e| {
            emitted.push((s.to_owned(), e.to_owned()))
        });

        assert_eq!(
            emitted,
            vec![
                ("2024-11-15".to_owned(), "".to_owned()),
                ("2024-11-10".to_owned(), "2024-11-15".to_owned()),
            ]
        );
        assert_eq!(range.classify(date("2024-11-12")), DayRole::InRange);
        // picking does not move the view
        assert_eq!(cal.view(), MonthIndex::new(Month::November, 2024));
    }
}
