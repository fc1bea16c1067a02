use ratatui::{
    prelude::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{listing, model::Model};

pub fn view(model: &Model, frame: &mut Frame, rect: Rect) {
    let title = model
        .files
        .current
        .as_ref()
        .map(listing::file_name)
        .unwrap_or("no file selected");

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", title));

    let lines: Vec<Line> = match model.store.current() {
        Some(snapshot) => model
            .graph
            .options
            .apply(snapshot.raw())
            .lines()
            .map(|line| Line::styled(line.to_owned(), get_line_style(line)))
            .collect(),
        None => vec![Line::styled(
            format!("[{}]", model.graph.fetch_status),
            Style::default().fg(Color::DarkGray),
        )],
    };

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .scroll((model.graph.scroll, 0)),
        rect,
    );
}

fn get_line_style(line: &str) -> Style {
    if line.contains("bgcolor=\"red\"") {
        Style::default().fg(Color::Red)
    } else if line.contains("bgcolor=\"yellow\"") {
        Style::default().fg(Color::Yellow)
    } else if line.contains("green\"") && line.contains("bgcolor=") {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}
