extern crate tripcal as lib;

use flexi_logger::{FileSpec, Logger};
use lib::config::load_suitable_config;
use lib::events::Dispatcher;
use lib::ui::{show::render_month, App, Context, Theme};
use lib::{CalendarDate, DateRange, RangeCalendar};
use nix::sys::termios;
use std::io::stdout;
use std::path::PathBuf;
use structopt::StructOpt;
use unsegen::base::Terminal;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "tc",
    author = "The tripcal developers",
    about = "tripcal - pick a travel date range in the terminal."
)]
pub struct Args {
    #[structopt(long = "start", help = "first day of the range (YYYY-MM-DD)")]
    pub start: Option<String>,

    #[structopt(long = "end", help = "last day of the range (YYYY-MM-DD)")]
    pub end: Option<String>,

    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only print the month non-interactively"
    )]
    pub show: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    let config = load_suitable_config(args.configfile.as_deref())?;
    let range = DateRange::from_props(args.start.as_deref(), args.end.as_deref());

    if args.show {
        let calendar = RangeCalendar::new(range.start());
        println!(
            "{}",
            render_month(
                &calendar,
                &range,
                &Theme::from_config(&config),
                &config.weekday_labels,
                CalendarDate::today(),
            )
        );
        return Ok(());
    }

    const STDOUT: std::os::unix::io::RawFd = 0;
    let orig_attr = std::sync::Mutex::new(termios::tcgetattr(STDOUT)?);

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        if let Ok(attr) = orig_attr.lock() {
            let _ = termios::tcsetattr(STDOUT, termios::SetArg::TCSANOW, &attr);
        }

        println!("tripcal ran into a fatal error!");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let dispatcher = Dispatcher::from_config(&config);
    // Setup unsegen terminal
    let stdout = stdout();
    let term = Terminal::new(stdout.lock())?;

    let mut app = App::new(Context::new(&config, range));

    app.run(dispatcher, term)?;

    // Hand the final range to whoever started us
    let (start, end) = app.range().to_props();
    println!("{} {}", start, end);

    Ok(())
}
