use crate::calendar::{GridCell, RangeCalendar};
use crate::date::CalendarDate;
use crate::range::DateRange;

use super::month_pane::{blank_cell, title_line, weekday_line, DayCell};
use super::Theme;

/// Plain text rendition of the shown month, used by the non-interactive mode.
///
/// Range endpoints are framed with `[` and `]`, days in between with `-`.
pub fn render_month(
    calendar: &RangeCalendar,
    range: &DateRange,
    theme: &Theme,
    weekday_labels: &[String],
    today: CalendarDate,
) -> String {
    let grid = calendar.grid();

    let mut lines = vec![title_line(grid.month()), weekday_line(weekday_labels)];

    for week in grid.weeks() {
        let line: String = week
            .into_iter()
            .map(|cell| match cell {
                GridCell::Empty => blank_cell(),
                GridCell::Day(date) => DayCell::new(date.day(), theme)
                    .role(range.classify(date))
                    .today(date == today)
                    .to_string(),
            })
            .collect();
        lines.push(line);
    }

    lines
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}
