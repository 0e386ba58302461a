/// Keyboard input.
///
/// Turn-based: the loop blocks on the next key press and maps it to a
/// `Command`. Letter bindings come from `[keys]` in config and are matched
/// case-insensitively; arrow keys always work as directions.
///
/// Release and Repeat events are dropped so a held key makes one move.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::KeyConfig;
use crate::domain::grid::Direction;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(Direction),
    /// Menu: pick the entry at this index directly.
    Choose(usize),
    Confirm,
    NewGame,
    Quit,
    /// A key with no binding. The shell reports it; no state changes.
    Invalid(char),
}

pub struct InputState {
    keys: KeyConfig,
}

impl InputState {
    pub fn new(keys: KeyConfig) -> Self {
        InputState { keys }
    }

    pub fn keys(&self) -> &KeyConfig {
        &self.keys
    }

    /// Block until a key press maps to a command.
    pub fn next_command(&mut self) -> std::io::Result<Command> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(cmd) = map_key(&self.keys, key) {
                    return Ok(cmd);
                }
            }
        }
    }
}

/// Map a single-letter token to a direction using the configured letters.
pub fn parse_direction(keys: &KeyConfig, token: &str) -> Option<Direction> {
    let mut chars = token.trim().chars();
    let c = chars.next()?.to_ascii_lowercase();
    if chars.next().is_some() {
        return None;
    }
    match c {
        _ if c == keys.up => Some(Direction::Up),
        _ if c == keys.left => Some(Direction::Left),
        _ if c == keys.down => Some(Direction::Down),
        _ if c == keys.right => Some(Direction::Right),
        _ => None,
    }
}

/// `None` for keys the shell ignores entirely (modifiers, function keys).
pub fn map_key(keys: &KeyConfig, key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(Command::Quit);
    }

    match key.code {
        KeyCode::Up => Some(Command::Move(Direction::Up)),
        KeyCode::Down => Some(Command::Move(Direction::Down)),
        KeyCode::Left => Some(Command::Move(Direction::Left)),
        KeyCode::Right => Some(Command::Move(Direction::Right)),
        KeyCode::Enter => Some(Command::Confirm),
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('1') => Some(Command::Choose(0)),
        KeyCode::Char('2') => Some(Command::Choose(1)),
        KeyCode::Char(' ') => Some(Command::Confirm),
        KeyCode::Char(c) => {
            let lower = c.to_ascii_lowercase();
            if let Some(dir) = parse_direction(keys, lower.encode_utf8(&mut [0; 4])) {
                Some(Command::Move(dir))
            } else if lower == keys.quit {
                Some(Command::Quit)
            } else if lower == keys.new_game {
                Some(Command::NewGame)
            } else {
                Some(Command::Invalid(c))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn wasd_maps_case_insensitively() {
        let k = KeyConfig::default();
        assert_eq!(parse_direction(&k, "w"), Some(Direction::Up));
        assert_eq!(parse_direction(&k, "A"), Some(Direction::Left));
        assert_eq!(parse_direction(&k, "s"), Some(Direction::Down));
        assert_eq!(parse_direction(&k, "D"), Some(Direction::Right));
    }

    #[test]
    fn other_tokens_rejected() {
        let k = KeyConfig::default();
        assert_eq!(parse_direction(&k, "x"), None);
        assert_eq!(parse_direction(&k, "wa"), None);
        assert_eq!(parse_direction(&k, ""), None);
    }

    #[test]
    fn custom_letters_replace_defaults() {
        let k = KeyConfig { up: 'k', left: 'h', down: 'j', right: 'l', ..KeyConfig::default() };
        assert_eq!(parse_direction(&k, "K"), Some(Direction::Up));
        assert_eq!(parse_direction(&k, "w"), None);
        assert_eq!(map_key(&k, press(KeyCode::Char('h'))), Some(Command::Move(Direction::Left)));
    }

    #[test]
    fn arrows_and_meta_keys() {
        let k = KeyConfig::default();
        assert_eq!(map_key(&k, press(KeyCode::Up)), Some(Command::Move(Direction::Up)));
        assert_eq!(map_key(&k, press(KeyCode::Right)), Some(Command::Move(Direction::Right)));
        assert_eq!(map_key(&k, press(KeyCode::Char('Q'))), Some(Command::Quit));
        assert_eq!(map_key(&k, press(KeyCode::Char('n'))), Some(Command::NewGame));
        assert_eq!(map_key(&k, press(KeyCode::Enter)), Some(Command::Confirm));
        assert_eq!(map_key(&k, press(KeyCode::Char('2'))), Some(Command::Choose(1)));
        assert_eq!(map_key(&k, press(KeyCode::Char('z'))), Some(Command::Invalid('z')));
        assert_eq!(map_key(&k, press(KeyCode::F(5))), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let k = KeyConfig::default();
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&k, ev), Some(Command::Quit));
    }
}
