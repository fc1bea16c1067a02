use std::collections::HashMap;

use crate::{
    key::Key,
    message::{KeymapMessage, Mode},
    KeyMapError,
};

#[derive(Debug, Default)]
pub struct KeyTree {
    modes: HashMap<Mode, Node>,
}

#[derive(Clone, Debug)]
pub enum Node {
    Binding(KeymapMessage),
    Key(HashMap<Key, Node>),
}

impl KeyTree {
    pub fn add_mapping(
        &mut self,
        mode: &Mode,
        keys: Vec<Key>,
        message: KeymapMessage,
    ) -> Result<(), KeyMapError> {
        let (last, path) = match keys.split_last() {
            Some(it) => it,
            None => return Err(KeyMapError::NoKeysRemaining),
        };

        let mut node = self
            .modes
            .entry(mode.clone())
            .or_insert_with(|| Node::Key(HashMap::new()));

        for key in path {
            node = match node {
                Node::Key(map) => map
                    .entry(key.clone())
                    .or_insert_with(|| Node::Key(HashMap::new())),
                Node::Binding(_) => return Err(KeyMapError::MappingConflict(key.to_string())),
            };
        }

        match node {
            Node::Key(map) => {
                if map.contains_key(last) {
                    return Err(KeyMapError::MappingConflict(last.to_string()));
                }
                map.insert(last.clone(), Node::Binding(message));
                Ok(())
            }
            Node::Binding(_) => Err(KeyMapError::MappingConflict(last.to_string())),
        }
    }

    pub fn get_binding(&self, mode: &Mode, keys: &[Key]) -> Result<KeymapMessage, KeyMapError> {
        let mut node = match self.modes.get(mode) {
            Some(it) => it,
            None => return Err(KeyMapError::ModeUnresolvable(mode.to_string())),
        };

        for key in keys {
            node = match node {
                Node::Key(map) => match map.get(key) {
                    Some(it) => it,
                    None => return Err(KeyMapError::NoValidBindingFound),
                },
                Node::Binding(_) => return Err(KeyMapError::NoValidBindingFound),
            };
        }

        match node {
            Node::Binding(message) => Ok(message.clone()),
            Node::Key(_) => Err(KeyMapError::KeySequenceIncomplete),
        }
    }
}
