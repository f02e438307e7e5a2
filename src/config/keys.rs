//! Key notation types and parsing
//!
//! This module provides types for representing keystrokes and keystroke
//! sequences, parsed from vim-style notation (e.g., "C-x", "M-S-w", "<CR>",
//! or a prefixed sequence like "g z #").

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyModifiers};

/// A key combination (key code + modifiers)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a KeyCombo from a crossterm KeyEvent
    ///
    /// Uppercase characters are normalized to lowercase + SHIFT so that "G"
    /// in notation matches a Shift+g key event.
    pub fn from_key_event(event: &crossterm::event::KeyEvent) -> Self {
        match event.code {
            KeyCode::Char(c) if c.is_ascii_uppercase() => Self {
                code: KeyCode::Char(c.to_ascii_lowercase()),
                modifiers: event.modifiers | KeyModifiers::SHIFT,
            },
            _ => Self {
                code: event.code,
                modifiers: event.modifiers,
            },
        }
    }
}

/// Named keys written in angle brackets, first spelling is canonical
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("CR", KeyCode::Enter),
    ("Enter", KeyCode::Enter),
    ("Esc", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("BS", KeyCode::Backspace),
    ("Del", KeyCode::Delete),
    ("Space", KeyCode::Char(' ')),
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
];

fn named_key(name: &str) -> Option<KeyCode> {
    let function = name
        .strip_prefix(|c: char| c.eq_ignore_ascii_case(&'F'))
        .and_then(|n| n.parse::<u8>().ok());
    if let Some(n) = function {
        return (1..=12).contains(&n).then_some(KeyCode::F(n));
    }
    NAMED_KEYS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code)
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "<Space>".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("<F{}>", n),
        other => NAMED_KEYS
            .iter()
            .find(|(_, known)| *known == other)
            .map(|(name, _)| format!("<{}>", name))
            .unwrap_or_else(|| format!("{:?}", other)),
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Shifted letters print as their uppercase form
        if let KeyCode::Char(c) = self.code {
            if c.is_ascii_lowercase() && self.modifiers == KeyModifiers::SHIFT {
                return write!(f, "{}", c.to_ascii_uppercase());
            }
        }
        for (flag, prefix) in MODIFIERS {
            if self.modifiers.contains(*flag) {
                write!(f, "{}-", prefix)?;
            }
        }
        f.write_str(&key_name(self.code))
    }
}

const MODIFIERS: &[(KeyModifiers, &str)] = &[
    (KeyModifiers::CONTROL, "C"),
    (KeyModifiers::ALT, "M"),
    (KeyModifiers::SHIFT, "S"),
];

fn modifier(prefix: &str) -> Option<KeyModifiers> {
    MODIFIERS
        .iter()
        .find(|(_, known)| *known == prefix)
        .map(|(flag, _)| *flag)
}

/// A sequence of keystrokes, e.g. a prefix key followed by a command key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeySequence(pub Vec<KeyCombo>);

impl KeySequence {
    pub fn keys(&self) -> &[KeyCombo] {
        &self.0
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(" "))
    }
}

impl FromStr for KeySequence {
    type Err = KeyParseError;

    /// Keystrokes are separated by whitespace: "g z #", "z C-h", "<CR>"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keys = s
            .split_whitespace()
            .map(parse_key_notation)
            .collect::<Result<Vec<_>, _>>()?;
        if keys.is_empty() {
            return Err(KeyParseError::Empty);
        }
        Ok(Self(keys))
    }
}

/// Parse one keystroke in vim-style notation
///
/// Supported notation:
/// - a single character, including `C`, `M`, `S` and `-` themselves;
///   uppercase letters carry SHIFT
/// - `C-x` Ctrl, `M-x` Alt (Meta), `S-x` Shift, combinable as `C-S-x`
/// - `C--` for Ctrl+minus
/// - named keys in angle brackets: `<CR>`, `<Esc>`, `<Tab>`, `<BS>`,
///   `<Del>`, `<Space>`, arrows, `<PageUp>`, `<Home>`, `<F1>`..`<F12>`,
///   optionally with modifiers inside (`<C-CR>`)
pub fn parse_key_notation(s: &str) -> Result<KeyCombo, KeyParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(KeyParseError::Empty);
    }

    if let Some(inner) = s.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
        let (modifiers, name) = split_modifiers(inner)?;
        let code =
            named_key(name).ok_or_else(|| KeyParseError::InvalidSpecialKey(name.to_string()))?;
        return Ok(KeyCombo::new(code, modifiers));
    }

    let (mut modifiers, key) = split_modifiers(s)?;
    let mut chars = key.chars();
    let c = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        (None, _) => return Err(KeyParseError::NoKey),
        _ => return Err(KeyParseError::InvalidKey(key.to_string())),
    };
    if c.is_ascii_uppercase() {
        modifiers |= KeyModifiers::SHIFT;
    }
    Ok(KeyCombo::new(KeyCode::Char(c.to_ascii_lowercase()), modifiers))
}

/// Split `C-M-x` into its modifiers and the final key.
///
/// A lone character is always the key. A trailing `--` names the minus key.
fn split_modifiers(s: &str) -> Result<(KeyModifiers, &str), KeyParseError> {
    if s.chars().count() == 1 {
        return Ok((KeyModifiers::NONE, s));
    }
    let (body, key) = match s.strip_suffix("--") {
        Some(body) => (body, "-"),
        None => match s.rsplit_once('-') {
            Some((body, key)) => (body, key),
            None => return Ok((KeyModifiers::NONE, s)),
        },
    };
    let mut modifiers = KeyModifiers::NONE;
    for prefix in body.split('-').filter(|p| !p.is_empty()) {
        modifiers |=
            modifier(prefix).ok_or_else(|| KeyParseError::InvalidModifier(prefix.to_string()))?;
    }
    Ok((modifiers, key))
}

/// Error type for key parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    Empty,
    NoKey,
    InvalidKey(String),
    InvalidModifier(String),
    InvalidSpecialKey(String),
}

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyParseError::Empty => write!(f, "empty key notation"),
            KeyParseError::NoKey => write!(f, "no key specified"),
            KeyParseError::InvalidKey(s) => write!(f, "invalid key: {}", s),
            KeyParseError::InvalidModifier(s) => write!(f, "invalid modifier: {}", s),
            KeyParseError::InvalidSpecialKey(s) => write!(f, "invalid special key: {}", s),
        }
    }
}

impl std::error::Error for KeyParseError {}

impl FromStr for KeyCombo {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key_notation(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let key = parse_key_notation("a").unwrap();
        assert_eq!(key.code, KeyCode::Char('a'));
        assert_eq!(key.modifiers, KeyModifiers::NONE);
    }

    #[test]
    fn test_parse_ctrl_key() {
        let key = parse_key_notation("C-p").unwrap();
        assert_eq!(key.code, KeyCode::Char('p'));
        assert_eq!(key.modifiers, KeyModifiers::CONTROL);
    }

    #[test]
    fn test_modifier_letters_alone_are_keys() {
        let key = parse_key_notation("C").unwrap();
        assert_eq!(key.code, KeyCode::Char('c'));
        assert_eq!(key.modifiers, KeyModifiers::SHIFT);

        let key = parse_key_notation("S").unwrap();
        assert_eq!(key.code, KeyCode::Char('s'));
        assert_eq!(key.modifiers, KeyModifiers::SHIFT);
    }

    #[test]
    fn test_parse_punctuation_keys() {
        for c in ['-', '!', '#', '%', '@', '$', '~', '&'] {
            let key = parse_key_notation(&c.to_string()).unwrap();
            assert_eq!(key.code, KeyCode::Char(c));
            assert_eq!(key.modifiers, KeyModifiers::NONE);
        }
        let key = parse_key_notation("C--").unwrap();
        assert_eq!(key.code, KeyCode::Char('-'));
        assert_eq!(key.modifiers, KeyModifiers::CONTROL);
    }

    #[test]
    fn test_parse_special_keys() {
        assert_eq!(parse_key_notation("<CR>").unwrap().code, KeyCode::Enter);
        assert_eq!(parse_key_notation("<Esc>").unwrap().code, KeyCode::Esc);
        assert_eq!(parse_key_notation("<BS>").unwrap().code, KeyCode::Backspace);
        assert_eq!(parse_key_notation("<F12>").unwrap().code, KeyCode::F(12));
        assert!(parse_key_notation("<F13>").is_err());
        assert!(parse_key_notation("<Nope>").is_err());
    }

    #[test]
    fn test_parse_bad_modifier() {
        assert_eq!(
            parse_key_notation("X-a"),
            Err(KeyParseError::InvalidModifier("X".to_string()))
        );
    }

    #[test]
    fn test_parse_sequence() {
        let seq: KeySequence = "g z #".parse().unwrap();
        assert_eq!(seq.keys().len(), 3);
        assert_eq!(seq.keys()[2].code, KeyCode::Char('#'));
        assert_eq!(seq.to_string(), "g z #");

        let seq: KeySequence = "z C-h".parse().unwrap();
        assert_eq!(seq.to_string(), "z C-h");

        assert_eq!("  ".parse::<KeySequence>(), Err(KeyParseError::Empty));
    }

    #[test]
    fn test_display_key_combo() {
        let key = KeyCombo::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(key.to_string(), "C-x");

        let key = KeyCombo::new(KeyCode::Char('w'), KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(key.to_string(), "C-S-w");

        let key = KeyCombo::new(KeyCode::Char('o'), KeyModifiers::SHIFT);
        assert_eq!(key.to_string(), "O");

        let key = KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(key.to_string(), "<CR>");
    }

    #[test]
    fn test_display_round_trips_notation() {
        for notation in ["O", "g C", "z C-h", "g -", "<CR>", "M-S-j"] {
            let seq: KeySequence = notation.parse().unwrap();
            assert_eq!(seq.to_string(), notation);
        }
    }

    #[test]
    fn test_from_key_event_normalizes_uppercase() {
        use crossterm::event::{KeyEvent, KeyEventKind, KeyEventState};

        let event = KeyEvent {
            code: KeyCode::Char('O'),
            modifiers: KeyModifiers::SHIFT,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        let combo = KeyCombo::from_key_event(&event);

        assert_eq!(combo.code, KeyCode::Char('o'));
        assert_eq!(combo, parse_key_notation("O").unwrap());
    }
}
