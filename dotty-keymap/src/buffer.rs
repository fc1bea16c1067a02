use std::fmt::Display;

use crate::key::Key;

#[derive(Debug, Default)]
pub struct KeyBuffer {
    buffer: Vec<Key>,
}

impl KeyBuffer {
    pub fn add_key(&mut self, key: Key) {
        self.buffer.push(key);
    }

    pub fn get_keys(&self) -> &[Key] {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// The text typed by the buffered keys, None if any key is not printable.
    pub fn to_text(&self) -> Option<String> {
        self.buffer.iter().map(Key::to_char).collect()
    }

    pub fn to_keycode_string(&self) -> String {
        self.buffer
            .iter()
            .map(|key| key.to_keycode_string())
            .collect()
    }
}

impl Display for KeyBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for key in &self.buffer {
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}
