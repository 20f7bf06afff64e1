//! Key mapping from terminal events to device commands.

use crate::types::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a key press to the command it stands for.
///
/// Arrow keys and vi keys are accepted alongside the device's own letters.
pub fn key_to_command(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release || key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match key.code {
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => Some(Command::MoveRight),
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => Some(Command::SoftDrop),
        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W') => Some(Command::RotateCw),
        KeyCode::Char(' ') | KeyCode::Enter => Some(Command::HardDrop),
        KeyCode::Char('r' | 'R') => Some(Command::Restart),
        _ => None,
    }
}

/// The byte to write to the device for a key press
pub fn key_to_byte(key: KeyEvent) -> Option<u8> {
    key_to_command(key).map(|c| c.as_byte())
}

/// Check if key should quit the harness.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_movement_keys() {
        assert_eq!(key_to_command(KeyEvent::from(KeyCode::Left)), Some(Command::MoveLeft));
        assert_eq!(key_to_command(KeyEvent::from(KeyCode::Right)), Some(Command::MoveRight));
        assert_eq!(key_to_command(KeyEvent::from(KeyCode::Down)), Some(Command::SoftDrop));
        assert_eq!(key_to_command(KeyEvent::from(KeyCode::Char('H'))), Some(Command::MoveLeft));
        assert_eq!(key_to_command(KeyEvent::from(KeyCode::Char('L'))), Some(Command::MoveRight));
        assert_eq!(key_to_command(KeyEvent::from(KeyCode::Char('J'))), Some(Command::SoftDrop));
    }

    #[test]
    fn test_device_letters_map_to_their_own_byte() {
        for byte in [b'a', b'd', b's', b'w', b' ', b'r'] {
            let key = KeyEvent::from(KeyCode::Char(byte as char));
            assert_eq!(key_to_byte(key), Some(byte));
        }
    }

    #[test]
    fn test_arrows_become_device_bytes() {
        assert_eq!(key_to_byte(KeyEvent::from(KeyCode::Up)), Some(b'w'));
        assert_eq!(key_to_byte(KeyEvent::from(KeyCode::Enter)), Some(b' '));
        assert_eq!(key_to_byte(KeyEvent::from(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_control_chords_are_not_commands() {
        let key = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(key_to_command(key), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
