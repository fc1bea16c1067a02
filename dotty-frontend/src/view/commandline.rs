use dotty_keymap::message::PrintContent;
use ratatui::{
    layout::Position,
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::model::Model;

pub fn view(model: &Model, frame: &mut Frame) {
    let commandline = &model.commandline;
    let rect = commandline.layout.buffer;

    if model.mode.is_command() {
        let content = format!(":{}", commandline.text);
        let width = content.chars().count() as u16;

        frame.render_widget(Paragraph::new(content), rect);
        frame.set_cursor_position(Position::new(
            rect.x + width.min(rect.width.saturating_sub(1)),
            rect.y,
        ));
    } else {
        let lines: Vec<_> = commandline
            .messages
            .iter()
            .map(|content| match content {
                PrintContent::Default(text) => Line::raw(text.as_str()),
                PrintContent::Error(text) => {
                    Line::styled(text.as_str(), Style::default().fg(Color::Red))
                }
                PrintContent::Information(text) => {
                    Line::styled(text.as_str(), Style::default().fg(Color::LightGreen))
                }
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), rect);
    }

    frame.render_widget(
        Paragraph::new(model.key_sequence.clone()),
        commandline.layout.key_sequence,
    );
}
