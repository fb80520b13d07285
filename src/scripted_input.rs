use std::{fs, path::Path};

use bracket_terminal::prelude::VirtualKeyCode;
use tracing::debug;

use crate::{error::ScriptError, input::KeyEvent};

/// Pre-recorded keypresses for headless runs.
///
/// Each non-comment line is read character by character. Letters, digits and
/// `.` `/` map to their keys; named keys go in angle brackets (`<esc>`,
/// `<enter>`, `<up>`, ...). Whitespace is ignored and `#` starts a comment
/// line.
pub struct ScriptedInput {
    keys: Vec<KeyEvent>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut keys = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line_no = number + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let mut chars = trimmed.chars();
            while let Some(c) = chars.next() {
                if c.is_whitespace() {
                    continue;
                }
                let token = if c == '<' {
                    let name: String = chars.by_ref().take_while(|&c| c != '>').collect();
                    named_key(&name).ok_or_else(|| ScriptError::UnknownKey {
                        token: format!("<{name}>"),
                        line: line_no,
                    })?
                } else {
                    char_key(c).ok_or_else(|| ScriptError::UnknownKey {
                        token: c.to_string(),
                        line: line_no,
                    })?
                };
                keys.push(token);
            }
        }
        debug!(keys = keys.len(), "parsed key script");
        Ok(Self { keys, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Iterator for ScriptedInput {
    type Item = KeyEvent;

    fn next(&mut self) -> Option<KeyEvent> {
        let key = self.keys.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(key)
    }
}

fn char_key(c: char) -> Option<KeyEvent> {
    use VirtualKeyCode::*;
    let key = match c.to_ascii_lowercase() {
        'a' => A,
        'b' => B,
        'c' => C,
        'd' => D,
        'e' => E,
        'f' => F,
        'g' => G,
        'h' => H,
        'i' => I,
        'j' => J,
        'k' => K,
        'l' => L,
        'm' => M,
        'n' => N,
        'o' => O,
        'p' => P,
        'q' => Q,
        'r' => R,
        's' => S,
        't' => T,
        'u' => U,
        'v' => V,
        'w' => W,
        'x' => X,
        'y' => Y,
        'z' => Z,
        '0' => Key0,
        '1' => Key1,
        '2' => Key2,
        '3' => Key3,
        '4' => Key4,
        '5' => Key5,
        '6' => Key6,
        '7' => Key7,
        '8' => Key8,
        '9' => Key9,
        '.' => Period,
        '/' => Slash,
        _ => return None,
    };
    let event = KeyEvent::new(key);
    Some(if c.is_ascii_uppercase() {
        event.with_shift()
    } else {
        event
    })
}

fn named_key(name: &str) -> Option<KeyEvent> {
    use VirtualKeyCode::*;
    let key = match name.to_ascii_lowercase().as_str() {
        "esc" | "escape" => Escape,
        "enter" | "return" => Return,
        "up" => Up,
        "down" => Down,
        "left" => Left,
        "right" => Right,
        "home" => Home,
        "end" => End,
        "pgup" => PageUp,
        "pgdn" => PageDown,
        _ => return None,
    };
    Some(KeyEvent::new(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_letters_and_named_keys() {
        let script = ScriptedInput::parse("# walk then look\nll .\n/<right><Enter>\n").unwrap();
        let keys: Vec<VirtualKeyCode> = script.map(|event| event.key).collect();
        assert_eq!(
            keys,
            vec![
                VirtualKeyCode::L,
                VirtualKeyCode::L,
                VirtualKeyCode::Period,
                VirtualKeyCode::Slash,
                VirtualKeyCode::Right,
                VirtualKeyCode::Return,
            ]
        );
    }

    #[test]
    fn uppercase_means_shift() {
        let mut script = ScriptedInput::parse("L").unwrap();
        assert_eq!(script.next(), Some(KeyEvent::new(VirtualKeyCode::L).with_shift()));
        assert_eq!(script.next(), None);
    }

    #[test]
    fn unknown_keys_report_their_line() {
        let err = ScriptedInput::parse("hjkl\n\nh?").err().unwrap();
        assert!(matches!(
            err,
            ScriptError::UnknownKey { ref token, line: 3 } if token == "?"
        ));
        let err = ScriptedInput::parse("<tab>").err().unwrap();
        assert!(matches!(
            err,
            ScriptError::UnknownKey { ref token, line: 1 } if token == "<tab>"
        ));
    }

    #[test]
    fn blank_script_is_empty() {
        let script = ScriptedInput::parse("\n   \n# nothing\n").unwrap();
        assert!(script.is_empty());
        assert_eq!(script.len(), 0);
    }
}
