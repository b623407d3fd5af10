//! Terminal key events mapped to viewer inputs

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key press as the state machines see it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Char(char),
    Backspace,
    Delete,
    Enter,
    Escape,
    Up,
    Down,
    /// Ctrl+C: leave the program
    Interrupt,
    Other,
}

impl From<KeyEvent> for Input {
    fn from(key: KeyEvent) -> Self {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('C') => Input::Interrupt,
                _ => Input::Other,
            };
        }

        match key.code {
            KeyCode::Char(c) => Input::Char(c),
            KeyCode::Backspace => Input::Backspace,
            KeyCode::Delete => Input::Delete,
            KeyCode::Enter => Input::Enter,
            KeyCode::Esc => Input::Escape,
            KeyCode::Up => Input::Up,
            KeyCode::Down => Input::Down,
            _ => Input::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_keys() {
        assert_eq!(Input::from(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE)), Input::Char('s'));
        assert_eq!(Input::from(KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT)), Input::Char('S'));
        assert_eq!(Input::from(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)), Input::Enter);
        assert_eq!(Input::from(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)), Input::Escape);
        assert_eq!(Input::from(KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE)), Input::Other);
    }

    #[test]
    fn test_ctrl_c_interrupts() {
        assert_eq!(
            Input::from(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Input::Interrupt
        );
        assert_eq!(Input::from(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)), Input::Other);
    }
}
