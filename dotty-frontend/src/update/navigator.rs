use dotty_keymap::message::HistoryJump;

use crate::{action::Action, model::Model};

use super::export;

pub fn step(model: &mut Model, delta: isize) -> Vec<Action> {
    if model.store.step(delta) {
        export::displayed(model)
    } else {
        Vec::new()
    }
}

pub fn jump(model: &mut Model, jump: HistoryJump) -> Vec<Action> {
    let changed = match jump {
        HistoryJump::First => model.store.first(),
        HistoryJump::Last => model.store.last(),
    };

    if changed {
        export::displayed(model)
    } else {
        Vec::new()
    }
}

/// Pins the history to the 1-based `version` shown on the slider.
pub fn pin(model: &mut Model, version: usize) -> Vec<Action> {
    let changed = match version.checked_sub(1) {
        Some(index) => model.store.set_current(index),
        None => false,
    };

    if changed {
        export::displayed(model)
    } else {
        Vec::new()
    }
}

pub fn reset(model: &mut Model) -> Vec<Action> {
    let before = model.store.current().map(|snapshot| snapshot.raw().to_owned());
    model.store.reset();

    let after = model.store.current().map(|snapshot| snapshot.raw());
    if before.as_deref() != after {
        export::displayed(model)
    } else {
        Vec::new()
    }
}
