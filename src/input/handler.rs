use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Keyboard commands. Steering is hand-only, so the keyboard covers just
/// session control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Start a fresh round (honored only once the game is over)
    Restart,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Char('r') | KeyCode::Char('R') => {
                KeyAction::Restart
            }
            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        let mut event = KeyEvent::new(code, modifiers);
        event.kind = KeyEventKind::Press;
        event
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            KeyAction::Quit
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Esc, KeyModifiers::NONE)),
            KeyAction::Quit
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_restart_keys() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('c'), KeyModifiers::NONE)),
            KeyAction::Restart
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('r'), KeyModifiers::NONE)),
            KeyAction::Restart
        );
    }

    #[test]
    fn test_arrows_do_not_steer() {
        let handler = InputHandler::new();
        for code in [KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right] {
            assert_eq!(
                handler.handle_key_event(key(code, KeyModifiers::NONE)),
                KeyAction::None
            );
        }
    }
}
