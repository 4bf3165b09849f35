use crate::errors::BenchlensResult;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, read};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Quit,
    ToggleLevel(usize),
    Redraw,
    Nothing,
}

/// Map one key event to a control. Release events are ignored so that
/// terminals reporting both edges do not toggle twice.
pub fn control_for_key(key: KeyEvent) -> Control {
    if key.kind == KeyEventKind::Release {
        return Control::Nothing;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Control::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Control::Quit,
        KeyCode::Char(c @ '0'..='2') => Control::ToggleLevel(c as usize - '0' as usize),
        _ => Control::Nothing,
    }
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> InputHandler {
        InputHandler
    }

    /// Block until the next event. Resizes become `Redraw` so the main loop
    /// repaints at the new size.
    pub fn next(&self) -> BenchlensResult<Control> {
        match read()? {
            Event::Key(key) => Ok(control_for_key(key)),
            Event::Resize(_, _) => Ok(Control::Redraw),
            _ => Ok(Control::Nothing),
        }
    }
}
