use std::{collections::VecDeque, fmt::Display, hash::Hash};

#[derive(Clone, Debug, Eq)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: Vec<KeyModifier>,
}

impl Key {
    pub fn new(code: KeyCode, modifiers: Vec<KeyModifier>) -> Self {
        Self { code, modifiers }
    }

    pub fn from_keycode_string(keycode: &str) -> Option<Self> {
        let regex = regex::Regex::new(r"[^-<>]+|^-$|--").expect("Failed to compile regex");
        let mut codes = regex
            .find_iter(keycode)
            .map(|m| m.as_str())
            .collect::<VecDeque<_>>();

        let mut modifiers = Vec::new();
        let mut last = codes.pop_back()?;
        if last == "--" {
            last = "-";
        }

        if last.chars().count() == 1 && last.chars().last()?.is_ascii_uppercase() {
            modifiers.push(KeyModifier::Shift);
        }

        for modifier in codes {
            match modifier.to_ascii_uppercase().as_str() {
                "A" => modifiers.push(KeyModifier::Alt),
                "C" => modifiers.push(KeyModifier::Ctrl),
                "S" => modifiers.push(KeyModifier::Shift),
                _ => (),
            }
        }

        KeyCode::from_keycode_string(last).map(|code| Self { code, modifiers })
    }

    /// The character this key types into the command line, if any.
    pub fn to_char(&self) -> Option<char> {
        if self
            .modifiers
            .iter()
            .any(|modifier| *modifier != KeyModifier::Shift)
        {
            return None;
        }

        let shift = self.modifiers.contains(&KeyModifier::Shift);
        match self.code {
            KeyCode::Backslash => Some('\\'),
            KeyCode::Bar => Some('|'),
            KeyCode::Char(c) if shift => Some(c.to_ascii_uppercase()),
            KeyCode::Char(c) => Some(c),
            KeyCode::LessThan => Some('<'),
            KeyCode::Space => Some(' '),
            _ => None,
        }
    }

    pub fn to_keycode_string(&self) -> String {
        let mut modifiers = self.modifiers.clone();
        modifiers.sort();

        match self.code {
            KeyCode::Char(_) => {
                if modifiers.contains(&KeyModifier::Shift) {
                    modifiers.retain(|modifier| *modifier != KeyModifier::Shift);
                    get_key_string(self.code.to_string().to_uppercase(), modifiers, false)
                } else {
                    get_key_string(self.code.to_string(), modifiers, false)
                }
            }
            _ => get_key_string(self.code.to_string(), modifiers, true),
        }
    }
}

impl Hash for Key {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_keycode_string().hash(state);
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        if self.code != other.code || self.modifiers.len() != other.modifiers.len() {
            return false;
        }

        self.modifiers
            .iter()
            .all(|modifier| other.modifiers.contains(modifier))
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_char() {
            Some(c) => write!(f, "{}", c),
            None => write!(f, "{}", self.to_keycode_string()),
        }
    }
}

fn get_key_string(code: String, modifiers: Vec<KeyModifier>, force_ltgt: bool) -> String {
    if modifiers.is_empty() && !force_ltgt {
        return code;
    }

    let mut result = String::from("<");
    for modifier in modifiers {
        match modifier {
            KeyModifier::Alt => result.push_str("A-"),
            KeyModifier::Ctrl => result.push_str("C-"),
            KeyModifier::Shift => result.push_str("S-"),
        };
    }

    result.push_str(&code);
    result.push('>');

    result
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum KeyCode {
    Backslash,
    Backspace,
    Bar,
    Char(char),
    Delete,
    Down,
    End,
    Enter,
    Esc,
    Home,
    Left,
    LessThan,
    PageDown,
    PageUp,
    Right,
    Space,
    Tab,
    Up,
}

impl KeyCode {
    pub fn from_keycode_string(keycode: &str) -> Option<Self> {
        match keycode {
            "bslash" => Some(KeyCode::Backslash),
            "bs" => Some(KeyCode::Backspace),
            "bar" => Some(KeyCode::Bar),
            "del" => Some(KeyCode::Delete),
            "down" => Some(KeyCode::Down),
            "end" => Some(KeyCode::End),
            "cr" => Some(KeyCode::Enter),
            "esc" => Some(KeyCode::Esc),
            "home" => Some(KeyCode::Home),
            "left" => Some(KeyCode::Left),
            "lt" => Some(KeyCode::LessThan),
            "pagedown" => Some(KeyCode::PageDown),
            "pageup" => Some(KeyCode::PageUp),
            "right" => Some(KeyCode::Right),
            "space" => Some(KeyCode::Space),
            "tab" => Some(KeyCode::Tab),
            "up" => Some(KeyCode::Up),
            code => {
                if code.chars().count() == 1 {
                    code.chars().next().map(Self::from_char)
                } else {
                    None
                }
            }
        }
    }

    pub fn from_char(c: char) -> KeyCode {
        match c {
            '\\' => KeyCode::Backslash,
            '|' => KeyCode::Bar,
            '<' => KeyCode::LessThan,
            ' ' => KeyCode::Space,
            passed => KeyCode::Char(passed.to_ascii_lowercase()),
        }
    }
}

impl Display for KeyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            KeyCode::Backslash => "bslash".to_string(),
            KeyCode::Backspace => "bs".to_string(),
            KeyCode::Bar => "bar".to_string(),
            KeyCode::Char(c) => c.to_string().to_lowercase(),
            KeyCode::Delete => "del".to_string(),
            KeyCode::Down => "down".to_string(),
            KeyCode::End => "end".to_string(),
            KeyCode::Enter => "cr".to_string(),
            KeyCode::Esc => "esc".to_string(),
            KeyCode::Home => "home".to_string(),
            KeyCode::Left => "left".to_string(),
            KeyCode::LessThan => "lt".to_string(),
            KeyCode::PageDown => "pagedown".to_string(),
            KeyCode::PageUp => "pageup".to_string(),
            KeyCode::Right => "right".to_string(),
            KeyCode::Space => "space".to_string(),
            KeyCode::Tab => "tab".to_string(),
            KeyCode::Up => "up".to_string(),
        };

        write!(f, "{}", code)
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum KeyModifier {
    Alt,
    Ctrl,
    Shift,
}
