use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key presses as the app sees them. Plain characters stay `Input`; whether
/// `q` quits or types a letter depends on what has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Cancel,
    NextField,
    PrevField,
    Submit,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Input(char),
    None,
}

pub fn map_key(key: KeyEvent) -> AppAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => AppAction::Quit,
            _ => AppAction::None,
        };
    }

    match key.code {
        KeyCode::Esc => AppAction::Cancel,
        KeyCode::Tab => AppAction::NextField,
        KeyCode::BackTab => AppAction::PrevField,
        KeyCode::Enter => AppAction::Submit,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Up => AppAction::Up,
        KeyCode::Down => AppAction::Down,
        KeyCode::Left => AppAction::Left,
        KeyCode::Right => AppAction::Right,
        KeyCode::Char(ch) => AppAction::Input(ch),
        _ => AppAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn ctrl_c_quits_and_other_chords_are_ignored() {
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            AppAction::Quit
        );
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            AppAction::None
        );
    }

    #[test]
    fn letters_are_input_not_commands() {
        assert_eq!(map_key(key(KeyCode::Char('q'))), AppAction::Input('q'));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            AppAction::Input('A')
        );
    }

    #[test]
    fn form_navigation_keys() {
        assert_eq!(map_key(key(KeyCode::Tab)), AppAction::NextField);
        assert_eq!(map_key(key(KeyCode::BackTab)), AppAction::PrevField);
        assert_eq!(map_key(key(KeyCode::Left)), AppAction::Left);
        assert_eq!(map_key(key(KeyCode::Enter)), AppAction::Submit);
        assert_eq!(map_key(key(KeyCode::Esc)), AppAction::Cancel);
    }
}
