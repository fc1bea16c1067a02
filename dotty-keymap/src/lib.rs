use buffer::KeyBuffer;
use key::{Key, KeyCode};
use map::KeyMap;
use message::{KeySequence, KeymapMessage, Mode};
use tree::KeyTree;

mod buffer;
pub mod conversion;
pub mod key;
mod map;
pub mod message;
mod tree;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum KeyMapError {
    #[error("Key sequence is incomplete.")]
    KeySequenceIncomplete,
    #[error("Key {0} is already mapped.")]
    MappingConflict(String),
    #[error("Failed to add mapping for mode {0}.")]
    ModeUnresolvable(String),
    #[error("Failed to resolve valid binding.")]
    NoValidBindingFound,
    #[error("No keys left.")]
    NoKeysRemaining,
}

#[derive(Debug)]
pub struct MessageResolver {
    buffer: KeyBuffer,
    pub mode: Mode,
    tree: KeyTree,
}

impl Default for MessageResolver {
    fn default() -> Self {
        Self {
            buffer: KeyBuffer::default(),
            mode: Mode::default(),
            tree: KeyMap::default().into_tree(),
        }
    }
}

impl MessageResolver {
    pub fn add_key(&mut self, key: Key) -> (Vec<KeymapMessage>, KeySequence) {
        if key.code == KeyCode::Esc && !self.buffer.is_empty() {
            let sequence = format!(
                "{}{}",
                self.buffer.to_keycode_string(),
                key.to_keycode_string()
            );
            self.buffer.clear();

            return (Vec::new(), KeySequence::Completed(sequence));
        }

        self.buffer.add_key(key);

        let sequence = self.buffer.to_keycode_string();
        match self.tree.get_binding(&self.mode, self.buffer.get_keys()) {
            Ok(message) => {
                self.buffer.clear();
                (vec![message], KeySequence::Completed(sequence))
            }
            Err(KeyMapError::KeySequenceIncomplete) => (Vec::new(), KeySequence::Changed(sequence)),
            Err(error) => {
                tracing::trace!("no binding for {} in {} mode: {}", sequence, self.mode, error);

                let messages = match (get_passthrough_by_mode(&self.mode), self.buffer.to_text()) {
                    (true, Some(text)) => vec![KeymapMessage::CommandlineInsert(text)],
                    _ => Vec::new(),
                };

                self.buffer.clear();
                (messages, KeySequence::Completed(sequence))
            }
        }
    }
}

fn get_passthrough_by_mode(mode: &Mode) -> bool {
    match mode {
        Mode::Command => true,
        Mode::Normal => false,
    }
}
