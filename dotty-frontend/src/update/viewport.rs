use dotty_keymap::message::ScrollDirection;

use crate::{action::Action, model::Model};

// border lines of the graph pane
const BORDER: u16 = 2;

pub fn scroll(model: &mut Model, direction: ScrollDirection) -> Vec<Action> {
    let height = model.layout.graph.height.saturating_sub(BORDER);
    let lines = model
        .store
        .current()
        .map(|snapshot| model.graph.options.apply(snapshot.raw()).lines().count())
        .unwrap_or_default();

    let max = u16::try_from(lines)
        .unwrap_or(u16::MAX)
        .saturating_sub(height);

    let half_page = (height / 2).max(1);
    let scroll = model.graph.scroll;
    model.graph.scroll = match direction {
        ScrollDirection::Down => scroll.saturating_add(1),
        ScrollDirection::HalfPageDown => scroll.saturating_add(half_page),
        ScrollDirection::HalfPageUp => scroll.saturating_sub(half_page),
        ScrollDirection::Up => scroll.saturating_sub(1),
    }
    .min(max);

    Vec::new()
}
