use ratatui::{
    prelude::Rect,
    style::{Color, Style},
    widgets::LineGauge,
    Frame,
};

use crate::model::Model;

pub fn view(model: &Model, frame: &mut Frame, rect: Rect) {
    let cursor = model.store.cursor();
    let span = cursor.ceiling.saturating_sub(cursor.floor);
    let position = cursor.current.saturating_sub(cursor.floor);

    let ratio = if span == 0 {
        1.0
    } else {
        position as f64 / span as f64
    };

    let observed_at = model
        .store
        .current()
        .and_then(|snapshot| snapshot.observed_at())
        .unwrap_or_default();

    let label = format!("{}/{} {}", position + 1, span + 1, observed_at);

    frame.render_widget(
        LineGauge::default()
            .ratio(ratio)
            .label(label)
            .filled_style(Style::default().fg(Color::Cyan))
            .unfilled_style(Style::default().fg(Color::DarkGray)),
        rect,
    );
}
