pub mod app;
pub mod command;
pub mod context;
pub mod month_pane;
pub mod show;

pub use app::App;
pub use command::CommandParser;
pub use context::{Context, Mode, Theme};
pub use month_pane::{DayCell, MonthPane};
