use unsegen::base::style::*;
use unsegen::widget::builtin::PromptLine;

use crate::calendar::RangeCalendar;
use crate::config::Config;
use crate::date::CalendarDate;
use crate::range::DateRange;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mode {
    Normal,
    Command,
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub day_style: StyleModifier,
    pub focus_day_style: StyleModifier,
    pub focus_day_char: Option<char>,
    pub today_day_style: StyleModifier,
    pub today_day_char: Option<char>,
    pub range_endpoint_style: StyleModifier,
    pub in_range_style: StyleModifier,
    pub month_header_style: StyleModifier,
    pub weekday_header_style: StyleModifier,
    pub error_style: StyleModifier,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            day_style: StyleModifier::new(),
            focus_day_style: StyleModifier::new().invert(true),
            focus_day_char: None,
            today_day_style: StyleModifier::new().fg_color(Color::Green),
            today_day_char: Some('*'),
            range_endpoint_style: StyleModifier::new()
                .bg_color(Color::Blue)
                .fg_color(Color::White),
            in_range_style: StyleModifier::new().fg_color(Color::Cyan),
            month_header_style: StyleModifier::new().fg_color(Color::Yellow),
            weekday_header_style: StyleModifier::new().fg_color(Color::Yellow),
            error_style: StyleModifier::new().fg_color(Color::LightRed),
        }
    }
}

impl Theme {
    pub fn from_config(config: &Config) -> Self {
        Theme {
            focus_day_char: config.focus_symbol,
            today_day_char: config.today_symbol,
            ..Theme::default()
        }
    }
}

/// State of the terminal host.
///
/// The host owns the selected range; the calendar only knows which month is
/// shown.
pub struct Context {
    pub mode: Mode,
    pub theme: Theme,
    pub weekday_labels: Vec<String>,
    pub last_error_message: Option<String>,
    calendar: RangeCalendar,
    range: DateRange,
    focus: CalendarDate,
    today: CalendarDate,
    command_line: PromptLine,
}

impl Context {
    pub fn new(config: &Config, range: DateRange) -> Self {
        Context::with_today(config, range, CalendarDate::today())
    }

    pub fn with_today(config: &Config, range: DateRange, today: CalendarDate) -> Self {
        Context {
            mode: Mode::Normal,
            theme: Theme::from_config(config),
            weekday_labels: config.weekday_labels.clone(),
            last_error_message: None,
            calendar: RangeCalendar::with_today(range.start(), today),
            range,
            focus: range.start().unwrap_or(today),
            today,
            command_line: PromptLine::with_prompt(":".to_owned()),
        }
    }

    pub fn calendar(&self) -> &RangeCalendar {
        &self.calendar
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn focus(&self) -> CalendarDate {
        self.focus
    }

    pub fn today(&self) -> CalendarDate {
        self.today
    }

    pub fn update(&mut self) {
        self.today = CalendarDate::today();
    }

    pub fn command_line(&self) -> &PromptLine {
        &self.command_line
    }

    pub fn command_line_mut(&mut self) -> &mut PromptLine {
        &mut self.command_line
    }

    /// Moves the focused day, following it with the view when it leaves the
    /// shown month.
    pub fn move_focus(&mut self, days: i64) {
        self.goto(self.focus.add_days(days));
    }

    pub fn goto(&mut self, date: CalendarDate) {
        self.focus = date;
        self.calendar.show(date);
    }

    pub fn select_today(&mut self) {
        self.goto(self.today);
    }

    /// Shows another month and keeps the focus on the same day of month where
    /// that day exists.
    pub fn navigate(&mut self, delta_months: i32) {
        self.calendar.navigate(delta_months);

        let view = self.calendar.view();
        let day = self.focus.day().min(view.num_days());
        self.focus = CalendarDate::from_ymd(view.year(), view.month().number_from_month(), day)
            .unwrap_or_else(|| view.first_day());
    }

    pub fn pick(&mut self, day: CalendarDate) {
        self.range = self.calendar.pick(day, &self.range, |start, end| {
            log::info!("Range changed to '{}' - '{}'", start, end)
        });
    }

    pub fn pick_focused(&mut self) {
        self.pick(self.focus);
    }

    pub fn clear(&mut self) {
        log::info!("Range cleared");
        self.range = DateRange::empty();
    }
}
