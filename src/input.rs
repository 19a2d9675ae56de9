use crate::game::InputEvent;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;

/// Everything the terminal reported since the last tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Polled {
    pub events: Vec<InputEvent>,
    /// Latest terminal size in cells, if it changed.
    pub resized: Option<(u16, u16)>,
}

/// Key binding. Releases and repeats are ignored.
pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputEvent::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(InputEvent::Quit),
        KeyCode::Char(' ') | KeyCode::Up => Some(InputEvent::Flap),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(InputEvent::Reset),
        _ => None,
    }
}

/// Drains every pending terminal event without blocking.
pub fn poll() -> io::Result<Polled> {
    let mut polled = Polled::default();
    while event::poll(Duration::ZERO)? {
        match event::read()? {
            Event::Key(key) => polled.events.extend(map_key(key)),
            Event::Resize(cols, rows) => polled.resized = Some((cols, rows)),
            _ => {}
        }
    }
    Ok(polled)
}
