use dotty_history::BadgeColor;
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::{listing, model::Model};

pub fn view(model: &Model, frame: &mut Frame, rect: Rect) {
    let file = get_file_content(model);
    let badge = get_badge_content(model);
    let position = get_position_content(model);

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(file.width() as u16),
            Constraint::Length(1),
            Constraint::Min(badge.width() as u16),
            Constraint::Length(position.width() as u16),
        ])
        .split(rect);

    frame.render_widget(
        Block::default().style(Style::default().bg(Color::Black)),
        rect,
    );

    frame.render_widget(Paragraph::new(file), layout[0]);
    frame.render_widget(Paragraph::new(badge), layout[2]);
    frame.render_widget(Paragraph::new(position), layout[3]);
}

fn get_file_content(model: &Model) -> Line {
    let name = model
        .files
        .current
        .as_ref()
        .map(listing::file_name)
        .unwrap_or("");

    let mut content = Vec::new();
    if let Some(ceiling) = get_ceiling(model) {
        content.push(Span::styled(
            format!("({}) ", ceiling),
            Style::default().fg(Color::Gray),
        ));
    }

    content.push(Span::styled(name, Style::default().fg(Color::Gray)));
    content.push(Span::styled(
        format!(" [{}]", model.graph.fetch_status),
        Style::default().fg(Color::DarkGray),
    ));

    Line::from(content)
}

/// Newest history index, hidden while there is nothing to step back to.
fn get_ceiling(model: &Model) -> Option<usize> {
    if model.store.is_empty() {
        return None;
    }

    match model.store.cursor().ceiling {
        0 => None,
        ceiling => Some(ceiling),
    }
}

fn get_badge_content(model: &Model) -> Line {
    let badge = match model.store.latest() {
        Some(snapshot) => snapshot.alerts().badge(),
        None => return Line::default(),
    };

    let color = match badge.color {
        BadgeColor::Red => Color::Red,
        BadgeColor::Yellow => Color::Yellow,
        BadgeColor::LightGreen => Color::LightGreen,
        BadgeColor::LightGrey => Color::Gray,
    };

    let text = if badge.text.is_empty() {
        " ".to_string()
    } else {
        badge.text
    };

    Line::from(Span::styled(
        format!(" {} ", text),
        Style::default().bg(color).fg(Color::Black),
    ))
}

fn get_position_content(model: &Model) -> Line {
    let mut content = Vec::new();
    if !model.graph.options.unit_details {
        content.push(Span::styled("units hidden ", Style::default().fg(Color::DarkGray)));
    }

    if model.store.is_empty() {
        return Line::from(content);
    }

    let cursor = model.store.cursor();
    if cursor.current != cursor.ceiling {
        content.push(Span::styled("pinned ", Style::default().fg(Color::Yellow)));
    }

    content.push(Span::styled(
        format!("{}/{}", cursor.current + 1, model.store.len()),
        Style::default().fg(Color::Gray),
    ));

    Line::from(content)
}

#[cfg(test)]
mod test {
    use crate::update::test;

    use super::*;

    #[test]
    fn file_content_shows_history_ceiling() {
        let mut model = test::model_with_file("a.dot");
        test::ingest(&mut model, "digraph { a }");
        assert_eq!(None, get_ceiling(&model));

        test::ingest(&mut model, "digraph { b }");
        test::ingest(&mut model, "digraph { c }");
        model.store.set_current(0);

        assert_eq!(Some(2), get_ceiling(&model));
        let text: String = get_file_content(&model)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        assert_eq!("(2) a.dot []", text);
    }
}
