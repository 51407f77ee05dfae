pub mod calendar;
pub mod config;
pub mod date;
pub mod error;
pub mod events;
pub mod range;
pub mod ui;

pub use calendar::{GridCell, MonthGrid, MonthIndex, RangeCalendar};
pub use date::CalendarDate;
pub use error::{Error, ErrorKind, Result};
pub use range::{DateRange, DayRole};
