use nom::{
    character::complete::{alpha1, digit1, space1},
    combinator::{all_consuming, map_res, opt, rest},
    sequence::{preceded, tuple},
    IResult,
};
use std::convert::TryFrom;
use unsegen::input::*;

use super::context::{Context, Mode};
use crate::date::CalendarDate;
use crate::error::{Error, ErrorKind, Result};

pub struct CommandParser<'a> {
    context: &'a mut Context,
}

fn split_command(input: &str) -> IResult<&str, (Option<u32>, &str, Option<&str>)> {
    all_consuming(tuple((
        opt(map_res(digit1, |s: &str| s.parse::<u32>())),
        alpha1,
        opt(preceded(space1, rest)),
    )))(input)
}

pub fn run_command(context: &mut Context, cmd: &str) -> ActionResult {
    let (_, (repeat, name, arg)) = split_command(cmd.trim())?;

    let (_, act) = COMMANDS
        .iter()
        .find(|(cmd_name, _)| *cmd_name == name)
        .ok_or_else(|| Error::new(ErrorKind::CommandParse, &format!("'{}'", name)))?;

    match (act, repeat, arg) {
        (Action::Repeatable(a), repeat, None) => a(context, repeat.unwrap_or(1)),
        (Action::Arg(a), None, Some(arg)) => a(context, arg.trim()),
        (Action::NoArg(a), None, None) => a(context),
        _ => Err(Error::new(
            ErrorKind::CommandParse,
            &format!("invalid use of '{}'", name),
        )),
    }
}

impl<'a> CommandParser<'a> {
    pub fn new(context: &'a mut Context) -> Self {
        CommandParser { context }
    }

    fn report_error(&mut self, error: Error) {
        log::warn!("{}", error);
        self.context.last_error_message = Some(format!("{}", error));
    }
}

impl Behavior for CommandParser<'_> {
    fn input(mut self, input: Input) -> Option<Input> {
        if let Event::Key(Key::Char('\n')) = input.event {
            let cmd = self.context.command_line_mut().finish_line().to_owned();
            if let Err(e) = run_command(self.context, &cmd) {
                self.report_error(e);
            } else {
                self.context.last_error_message = None;
                self.context.mode = Mode::Normal;
            }
            None
        } else {
            Some(input)
        }
    }
}

pub type ActionResult = Result<()>;

pub enum Action {
    Arg(fn(&mut Context, &str) -> ActionResult),
    NoArg(fn(&mut Context) -> ActionResult),
    Repeatable(fn(&mut Context, u32) -> ActionResult),
}

/// Months to move for `count` repetitions of a step of `step` months.
fn month_delta(count: u32, step: i32) -> Result<i32> {
    i32::try_from(count)
        .ok()
        .and_then(|count| count.checked_mul(step))
        .ok_or_else(|| {
            Error::from(ErrorKind::CommandParse)
                .with_msg(&format!("repeat count {} is too large", count))
        })
}

const COMMANDS: &[(&str, Action)] = &[
    (
        "nm",
        Action::Repeatable(|c, p| {
            c.navigate(month_delta(p, 1)?);
            Ok(())
        }),
    ),
    (
        "pm",
        Action::Repeatable(|c, p| {
            c.navigate(month_delta(p, -1)?);
            Ok(())
        }),
    ),
    (
        "ny",
        Action::Repeatable(|c, p| {
            c.navigate(month_delta(p, 12)?);
            Ok(())
        }),
    ),
    (
        "py",
        Action::Repeatable(|c, p| {
            c.navigate(month_delta(p, -12)?);
            Ok(())
        }),
    ),
    (
        "pick",
        Action::Arg(|c, arg| {
            let day = arg.parse::<CalendarDate>()?;
            c.goto(day);
            c.pick(day);
            Ok(())
        }),
    ),
    (
        "goto",
        Action::Arg(|c, arg| {
            c.goto(arg.parse()?);
            Ok(())
        }),
    ),
    (
        "today",
        Action::NoArg(|c| {
            c.select_today();
            Ok(())
        }),
    ),
    (
        "clear",
        Action::NoArg(|c| {
            c.clear();
            Ok(())
        }),
    ),
];
