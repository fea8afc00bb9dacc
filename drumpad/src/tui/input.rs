use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

use super::mode::TuiState;
use crate::shared::{InputEvent, VOLUME_STEP};

// Drain whatever input is pending without blocking; the caller yields to the
// runtime between frames so background loads keep moving.
pub fn poll_input(ts: &TuiState) -> anyhow::Result<Vec<InputEvent>> {
    let mut events = vec![];
    while event::poll(Duration::ZERO)? {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                events.extend(handle_key(key.code, key.modifiers));
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                events.extend(ts.grid.hit_test(mouse.column, mouse.row).map(InputEvent::Tap));
            }
            _ => {}
        }
    }
    Ok(events)
}

fn handle_key(code: KeyCode, modifiers: KeyModifiers) -> Option<InputEvent> {
    match code {
        KeyCode::Esc => Some(InputEvent::Quit),
        // raw mode swallows the signal, so ctrl-c has to be handled here
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(InputEvent::Quit),
        KeyCode::Char(' ') => Some(InputEvent::StopAll),
        KeyCode::Char('[') => Some(InputEvent::NudgeVolume(-VOLUME_STEP)),
        KeyCode::Char(']') => Some(InputEvent::NudgeVolume(VOLUME_STEP)),
        KeyCode::Char(c) => char_to_pad(c).map(InputEvent::Tap),
        _ => None,
    }
}

// convert char to pad index
fn char_to_pad(c: char) -> Option<usize> {
    let idx = match c.to_ascii_lowercase() {
        '1' => 0, '2' => 1, '3' => 2,
        'q' => 3, 'w' => 4, 'e' => 5,
        'a' => 6, 's' => 7, 'd' => 8,
        'z' => 9, 'x' => 10, 'c' => 11,
        'v' => 12, 'b' => 13, 'n' => 14,
        _ => return None,
    };
    Some(idx)
}
