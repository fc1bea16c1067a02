use ratatui::{
    prelude::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{
    model::Model,
    status::{AgentState, Fragment, Segment, SegmentKind},
};

pub fn view(model: &Model, frame: &mut Frame, rect: Rect) {
    let title = model
        .status
        .fragment
        .as_deref()
        .and_then(Fragment::parse)
        .map(|fragment| fragment.title())
        .unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", title));

    let lines: Vec<Line> = match &model.status.text {
        Some(text) => text
            .lines
            .iter()
            .map(|line| Line::from(line.iter().flat_map(get_spans).collect::<Vec<_>>()))
            .collect(),
        None => vec![Line::styled(
            "[loading...]",
            Style::default().fg(Color::DarkGray),
        )],
    };

    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

fn get_spans(segment: &Segment) -> Vec<Span<'_>> {
    let text = segment.text.as_str();
    match &segment.kind {
        SegmentKind::AgentState(state) => {
            let color = match state {
                AgentState::Error => Color::Red,
                AgentState::Ok => Color::Green,
                AgentState::Other => Color::Yellow,
            };
            vec![Span::styled(
                text,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]
        }
        SegmentKind::Key => vec![Span::styled(text, Style::default().fg(Color::Cyan))],
        SegmentKind::MachineLink(url) => vec![
            Span::styled(
                text,
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            ),
            Span::styled(format!(" <{}>", url), Style::default().fg(Color::DarkGray)),
        ],
        SegmentKind::Plain | SegmentKind::String => vec![Span::raw(text)],
        SegmentKind::Value => vec![Span::styled(text, Style::default().fg(Color::Magenta))],
    }
}
