use std::fmt::Write;

use crate::events::{Dispatcher, Event};
use crate::range::DateRange;

use super::{CommandParser, Context, Mode, MonthPane};

use unsegen::base::{Cursor, Terminal, Window};
use unsegen::input::{
    EditBehavior, Key, Navigatable, NavigateBehavior, OperationResult, ScrollBehavior, Scrollable,
};
use unsegen::widget::*;

pub struct App {
    context: Context,
}

impl App {
    pub fn new(context: Context) -> App {
        App { context }
    }

    pub fn range(&self) -> DateRange {
        self.context.range()
    }

    fn bottom_bar<'w>(&'w self) -> impl Widget + 'w {
        let spacer = " ".with_demand(|_| Demand2D {
            width: ColDemand::exact(1),
            height: RowDemand::exact(1),
        });

        let mut layout = HLayout::new().widget(spacer);
        if self.context.mode == Mode::Command {
            layout = layout.widget(self.context.command_line().as_widget());
        }

        layout
    }

    fn as_widget<'w>(&'w self) -> impl Widget + 'w {
        VLayout::new()
            .widget(MonthPane::new(&self.context))
            .widget(StatusLine(&self.context))
            .widget(self.bottom_bar())
    }

    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut run = true;

        while run {
            // Handle events
            if let Ok(event) = dispatcher.next() {
                match event {
                    Event::Update => self.context.update(),
                    Event::Input(input) => {
                        if input.matches(Key::Esc) {
                            self.context.mode = Mode::Normal;
                        } else {
                            match self.context.mode {
                                Mode::Normal => {
                                    input
                                        .chain((Key::Char('q'), || run = false))
                                        .chain((Key::Char(':'), || {
                                            self.context.mode = Mode::Command
                                        }))
                                        .chain((Key::Char('\n'), || self.context.pick_focused()))
                                        .chain((Key::Char(' '), || self.context.pick_focused()))
                                        .chain(
                                            NavigateBehavior::new(&mut FocusBehaviour(
                                                &mut self.context,
                                            ))
                                            .down_on(Key::Char('j'))
                                            .up_on(Key::Char('k'))
                                            .left_on(Key::Char('h'))
                                            .right_on(Key::Char('l')),
                                        )
                                        .chain(
                                            ScrollBehavior::new(&mut MonthBehaviour(
                                                &mut self.context,
                                            ))
                                            .forwards_on(Key::Char('>'))
                                            .backwards_on(Key::Char('<')),
                                        )
                                        .finish();
                                }
                                Mode::Command => {
                                    input
                                        .chain(CommandParser::new(&mut self.context))
                                        .chain(
                                            EditBehavior::new(self.context.command_line_mut())
                                                .delete_forwards_on(Key::Delete)
                                                .delete_backwards_on(Key::Backspace)
                                                .left_on(Key::Left)
                                                .right_on(Key::Right),
                                        )
                                        .chain(
                                            ScrollBehavior::new(self.context.command_line_mut())
                                                .backwards_on(Key::Up)
                                                .forwards_on(Key::Down),
                                        )
                                        .finish();
                                }
                            }
                        }
                    }
                }
            } else {
                log::error!("Event channel closed");
                break;
            }

            // Draw
            let root = term.create_root_window();
            self.as_widget().draw(root, RenderingHints::new());
            term.present();
        }

        Ok(())
    }
}

struct StatusLine<'a>(&'a Context);

impl Widget for StatusLine<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(10),
            height: RowDemand::exact(2),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let range = self.0.range();
        let (start, end) = range.to_props();

        let mut cursor = Cursor::new(&mut window);
        cursor.fill_and_wrap_line();

        let status = match range.num_days() {
            Some(days) => write!(&mut cursor, "{} - {} ({} days)", start, end, days),
            None if range.is_empty() => write!(&mut cursor, "No range selected"),
            None => write!(&mut cursor, "{} - ...", start),
        };
        if let Err(err) = status {
            log::warn!("Error while writing status: {}", err);
        }

        if let Some(msg) = &self.0.last_error_message {
            cursor.apply_style_modifier(self.0.theme.error_style);
            if let Err(err) = write!(&mut cursor, "  {}", msg) {
                log::warn!("Error while writing status: {}", err);
            }
        }
    }
}

struct FocusBehaviour<'a>(&'a mut Context);

impl Navigatable for FocusBehaviour<'_> {
    fn move_down(&mut self) -> OperationResult {
        self.0.move_focus(7);
        Ok(())
    }

    fn move_left(&mut self) -> OperationResult {
        self.0.move_focus(-1);
        Ok(())
    }

    fn move_right(&mut self) -> OperationResult {
        self.0.move_focus(1);
        Ok(())
    }

    fn move_up(&mut self) -> OperationResult {
        self.0.move_focus(-7);
        Ok(())
    }
}

struct MonthBehaviour<'a>(&'a mut Context);

impl Scrollable for MonthBehaviour<'_> {
    fn scroll_backwards(&mut self) -> OperationResult {
        self.0.navigate(-1);
        Ok(())
    }

    fn scroll_forwards(&mut self) -> OperationResult {
        self.0.navigate(1);
        Ok(())
    }
}
