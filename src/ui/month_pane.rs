use itertools::Itertools;
use std::fmt::Display;
use unsegen::base::*;
use unsegen::widget::*;

use crate::calendar::{GridCell, MonthGrid, MonthIndex};
use crate::range::DayRole;

use super::{Context, Theme};

pub struct DayCell<'a> {
    day_num: u32,
    role: DayRole,
    focused: bool,
    is_today: bool,
    theme: &'a Theme,
}

impl<'a> DayCell<'a> {
    pub const CELL_HEIGHT: usize = 1;
    pub const CELL_WIDTH: usize = 5;

    pub fn new(day_num: u32, theme: &'a Theme) -> Self {
        DayCell {
            day_num,
            role: DayRole::None,
            focused: false,
            is_today: false,
            theme,
        }
    }

    pub fn role(mut self, role: DayRole) -> Self {
        self.role = role;
        self
    }

    pub fn focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn today(mut self, is_today: bool) -> Self {
        self.is_today = is_today;
        self
    }

    pub fn style(&self) -> StyleModifier {
        match self.role {
            DayRole::None => self.theme.day_style,
            DayRole::InRange => self.theme.in_range_style,
            _ => self.theme.range_endpoint_style,
        }
    }

    /// Modifiers layered on top of [`DayCell::style`].
    pub fn highlights(&self) -> Vec<StyleModifier> {
        let mut highlights = Vec::new();

        if self.is_today && self.role == DayRole::None {
            highlights.push(self.theme.today_day_style);
        }

        if self.focused {
            highlights.push(self.theme.focus_day_style);
        }

        highlights
    }

    fn marks(&self) -> (char, char) {
        let lead = match self.role {
            DayRole::RangeStart | DayRole::SingleDay => '[',
            DayRole::InRange => '-',
            _ if self.is_today => self.theme.today_day_char.unwrap_or(' '),
            _ => ' ',
        };

        let trail = match self.role {
            DayRole::RangeEnd | DayRole::SingleDay => ']',
            DayRole::InRange => '-',
            _ if self.focused => self.theme.focus_day_char.unwrap_or(' '),
            _ => ' ',
        };

        (lead, trail)
    }
}

impl Display for DayCell<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (lead, trail) = self.marks();
        write!(f, "{}{:>2}{} ", lead, self.day_num, trail)
    }
}

/// Month title framed by the previous/next markers.
pub fn title_line(month: MonthIndex) -> String {
    let width = MonthGrid::COLUMNS * DayCell::CELL_WIDTH - 2;
    format!(
        "<{:^width$}>",
        format!("{} {}", month.month().name(), month.year()),
        width = width
    )
}

pub fn weekday_line(labels: &[String]) -> String {
    labels
        .iter()
        .map(|label| format!(" {:<3} ", label.chars().take(3).collect::<String>()))
        .join("")
}

pub fn blank_cell() -> String {
    " ".repeat(DayCell::CELL_WIDTH)
}

pub struct MonthPane<'a> {
    context: &'a Context,
}

impl<'a> MonthPane<'a> {
    const HEADER_ROWS: usize = 2;
    const MAX_WEEKS: usize = 6;

    pub fn new(context: &'a Context) -> Self {
        MonthPane { context }
    }
}

impl Widget for MonthPane<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::exact(MonthGrid::COLUMNS * DayCell::CELL_WIDTH),
            height: RowDemand::exact(Self::HEADER_ROWS + Self::MAX_WEEKS * DayCell::CELL_HEIGHT),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let context = self.context;
        let theme = &context.theme;
        let grid = context.calendar().grid();
        let range = context.range();

        let mut cursor = Cursor::new(&mut window);

        cursor.set_style_modifier(theme.month_header_style);
        cursor.write(&title_line(grid.month()));
        cursor.fill_and_wrap_line();

        cursor.set_style_modifier(theme.weekday_header_style);
        cursor.write(&weekday_line(&context.weekday_labels));
        cursor.fill_and_wrap_line();

        for week in grid.weeks() {
            for cell in week {
                match cell {
                    GridCell::Empty => {
                        cursor.set_style_modifier(theme.day_style);
                        cursor.write(&blank_cell());
                    }
                    GridCell::Day(date) => {
                        let day = DayCell::new(date.day(), theme)
                            .role(range.classify(date))
                            .focus(date == context.focus())
                            .today(date == context.today());

                        cursor.set_style_modifier(day.style());
                        for highlight in day.highlights() {
                            cursor.apply_style_modifier(highlight);
                        }
                        cursor.write(&day.to_string());
                    }
                }
            }
            cursor.set_style_modifier(theme.day_style);
            cursor.fill_and_wrap_line();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Month;

    #[test]
    fn cell_marks() {
        let theme = Theme::default();
        let cell = |role| DayCell::new(7, &theme).role(role).to_string();

        assert_eq!(cell(DayRole::None), "  7  ");
        assert_eq!(cell(DayRole::RangeStart), "[ 7  ");
        assert_eq!(cell(DayRole::RangeEnd), "  7] ");
        assert_eq!(cell(DayRole::SingleDay), "[ 7] ");
        assert_eq!(cell(DayRole::InRange), "- 7- ");
        assert_eq!(cell(DayRole::None).len(), DayCell::CELL_WIDTH);
    }

    #[test]
    fn range_marks_win_over_today() {
        let theme = Theme::default();
        assert_eq!(DayCell::new(15, &theme).today(true).to_string(), "*15  ");
        assert_eq!(
            DayCell::new(15, &theme)
                .today(true)
                .role(DayRole::RangeStart)
                .to_string(),
            "[15  "
        );
    }

    #[test]
    fn focus_symbol_is_optional() {
        let mut theme = Theme::default();
        assert_eq!(DayCell::new(3, &theme).focus(true).to_string(), "  3  ");

        theme.focus_day_char = Some('<');
        assert_eq!(DayCell::new(3, &theme).focus(true).to_string(), "  3< ");
    }

    #[test]
    fn title_is_framed_by_navigation_marks() {
        let title = title_line(MonthIndex::new(Month::November, 2024));
        assert_eq!(title.len(), MonthGrid::COLUMNS * DayCell::CELL_WIDTH);
        assert!(title.starts_with('<'));
        assert!(title.ends_with('>'));
        assert_eq!(title.trim_matches(|c: char| c == '<' || c == '>').trim(), "November 2024");
    }

    #[test]
    fn weekday_labels_fill_columns() {
        let labels: Vec<String> = ["Sunday", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let line = weekday_line(&labels);
        assert_eq!(line.len(), 35);
        assert!(line.starts_with(" Sun  Mo "));
    }
}
