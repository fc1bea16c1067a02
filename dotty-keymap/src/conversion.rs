use std::collections::VecDeque;

use crossterm::event::{self, KeyEvent, KeyEventKind, KeyModifiers};

use crate::key::{Key, KeyCode, KeyModifier};

pub fn from_keycode_string(keycodes: &str) -> VecDeque<Key> {
    let mut keys = VecDeque::new();

    let regex = regex::Regex::new(r"<[^>]*>|.").expect("Failed to compile regex");
    for capture in regex.find_iter(keycodes).map(|m| m.as_str()) {
        if let Some(key) = Key::from_keycode_string(capture) {
            keys.push_back(key);
        }
    }

    keys
}

pub fn to_key(event: &KeyEvent) -> Option<Key> {
    let modifier = to_modifiers(event.modifiers);

    match event.code {
        event::KeyCode::Backspace => resolve(event.kind, KeyCode::Backspace, modifier),
        event::KeyCode::Enter => resolve(event.kind, KeyCode::Enter, modifier),
        event::KeyCode::Left => resolve(event.kind, KeyCode::Left, modifier),
        event::KeyCode::Right => resolve(event.kind, KeyCode::Right, modifier),
        event::KeyCode::Up => resolve(event.kind, KeyCode::Up, modifier),
        event::KeyCode::Down => resolve(event.kind, KeyCode::Down, modifier),
        event::KeyCode::Home => resolve(event.kind, KeyCode::Home, modifier),
        event::KeyCode::End => resolve(event.kind, KeyCode::End, modifier),
        event::KeyCode::PageUp => resolve(event.kind, KeyCode::PageUp, modifier),
        event::KeyCode::PageDown => resolve(event.kind, KeyCode::PageDown, modifier),
        event::KeyCode::Tab => resolve(event.kind, KeyCode::Tab, modifier),
        event::KeyCode::BackTab => {
            let mut modifier = modifier;
            if !modifier.contains(&KeyModifier::Shift) {
                modifier.push(KeyModifier::Shift);
            }
            resolve(event.kind, KeyCode::Tab, modifier)
        }
        event::KeyCode::Delete => resolve(event.kind, KeyCode::Delete, modifier),
        event::KeyCode::Char(c) => resolve(event.kind, KeyCode::from_char(c), modifier),
        event::KeyCode::Esc => resolve(event.kind, KeyCode::Esc, modifier),
        _ => None,
    }
}

fn resolve(kind: KeyEventKind, code: KeyCode, modifier: Vec<KeyModifier>) -> Option<Key> {
    if kind != KeyEventKind::Press {
        return None;
    }

    Some(Key::new(code, modifier))
}

fn to_modifiers(modifiers: KeyModifiers) -> Vec<KeyModifier> {
    let mut result = Vec::new();
    if modifiers.contains(KeyModifiers::ALT) || modifiers.contains(KeyModifiers::META) {
        result.push(KeyModifier::Alt);
    }
    if modifiers.contains(KeyModifiers::CONTROL) {
        result.push(KeyModifier::Ctrl);
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        result.push(KeyModifier::Shift);
    }
    result
}
