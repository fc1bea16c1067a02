use std::collections::HashMap;

use crate::{
    key::{Key, KeyCode, KeyModifier},
    message::{CycleDirection, HistoryJump, KeymapMessage, Mode, ScrollDirection},
    tree::KeyTree,
};

#[derive(Debug)]
pub struct KeyMap {
    mappings: HashMap<Mode, Vec<(Vec<Key>, KeymapMessage)>>,
}

impl KeyMap {
    pub fn into_tree(self) -> KeyTree {
        let mut tree = KeyTree::default();
        for (mode, mappings) in self.mappings {
            for (keys, message) in mappings {
                if let Err(error) = tree.add_mapping(&mode, keys, message) {
                    tracing::warn!("adding key mapping for {} mode failed: {:?}", mode, error);
                }
            }
        }
        tree
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut mappings = HashMap::new();

        mappings.insert(
            Mode::Command,
            vec![
                (
                    vec![Key::new(KeyCode::Backspace, vec![])],
                    KeymapMessage::CommandlineDelete,
                ),
                (
                    vec![Key::new(KeyCode::Enter, vec![])],
                    KeymapMessage::ExecuteCommand,
                ),
                (
                    vec![Key::new(KeyCode::Esc, vec![])],
                    KeymapMessage::ChangeMode(Mode::Command, Mode::Normal),
                ),
            ],
        );

        mappings.insert(
            Mode::Normal,
            vec![
                (
                    vec![Key::new(KeyCode::from_char(':'), vec![])],
                    KeymapMessage::ChangeMode(Mode::Normal, Mode::Command),
                ),
                (
                    vec![Key::new(KeyCode::Esc, vec![])],
                    KeymapMessage::ClearStatus,
                ),
                (
                    vec![Key::new(KeyCode::Left, vec![])],
                    KeymapMessage::StepHistory(-1),
                ),
                (
                    vec![Key::new(KeyCode::from_char('h'), vec![])],
                    KeymapMessage::StepHistory(-1),
                ),
                (
                    vec![Key::new(KeyCode::Right, vec![])],
                    KeymapMessage::StepHistory(1),
                ),
                (
                    vec![Key::new(KeyCode::from_char('l'), vec![])],
                    KeymapMessage::StepHistory(1),
                ),
                (
                    vec![
                        Key::new(KeyCode::from_char('g'), vec![]),
                        Key::new(KeyCode::from_char('g'), vec![]),
                    ],
                    KeymapMessage::JumpHistory(HistoryJump::First),
                ),
                (
                    vec![Key::new(KeyCode::Home, vec![])],
                    KeymapMessage::JumpHistory(HistoryJump::First),
                ),
                (
                    vec![Key::new(KeyCode::from_char('g'), vec![KeyModifier::Shift])],
                    KeymapMessage::JumpHistory(HistoryJump::Last),
                ),
                (
                    vec![Key::new(KeyCode::End, vec![])],
                    KeymapMessage::JumpHistory(HistoryJump::Last),
                ),
                (
                    vec![Key::new(KeyCode::from_char('r'), vec![KeyModifier::Shift])],
                    KeymapMessage::ResetHistory,
                ),
                (
                    vec![Key::new(KeyCode::from_char('r'), vec![])],
                    KeymapMessage::Reload,
                ),
                (
                    vec![Key::new(KeyCode::from_char('j'), vec![])],
                    KeymapMessage::ScrollGraph(ScrollDirection::Down),
                ),
                (
                    vec![Key::new(KeyCode::Down, vec![])],
                    KeymapMessage::ScrollGraph(ScrollDirection::Down),
                ),
                (
                    vec![Key::new(KeyCode::from_char('k'), vec![])],
                    KeymapMessage::ScrollGraph(ScrollDirection::Up),
                ),
                (
                    vec![Key::new(KeyCode::Up, vec![])],
                    KeymapMessage::ScrollGraph(ScrollDirection::Up),
                ),
                (
                    vec![Key::new(KeyCode::from_char('d'), vec![KeyModifier::Ctrl])],
                    KeymapMessage::ScrollGraph(ScrollDirection::HalfPageDown),
                ),
                (
                    vec![Key::new(KeyCode::PageDown, vec![])],
                    KeymapMessage::ScrollGraph(ScrollDirection::HalfPageDown),
                ),
                (
                    vec![Key::new(KeyCode::from_char('u'), vec![KeyModifier::Ctrl])],
                    KeymapMessage::ScrollGraph(ScrollDirection::HalfPageUp),
                ),
                (
                    vec![Key::new(KeyCode::PageUp, vec![])],
                    KeymapMessage::ScrollGraph(ScrollDirection::HalfPageUp),
                ),
                (
                    vec![Key::new(KeyCode::from_char(']'), vec![])],
                    KeymapMessage::CycleLink(CycleDirection::Next),
                ),
                (
                    vec![Key::new(KeyCode::from_char('['), vec![])],
                    KeymapMessage::CycleLink(CycleDirection::Previous),
                ),
                (
                    vec![Key::new(KeyCode::Tab, vec![])],
                    KeymapMessage::CycleFile(CycleDirection::Next),
                ),
                (
                    vec![Key::new(KeyCode::Tab, vec![KeyModifier::Shift])],
                    KeymapMessage::CycleFile(CycleDirection::Previous),
                ),
                (
                    vec![Key::new(KeyCode::from_char('u'), vec![])],
                    KeymapMessage::ToggleUnitDetails,
                ),
            ],
        );

        Self { mappings }
    }
}
