use ratatui::prelude::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Debug, Default)]
pub struct AppLayout {
    pub graph: Rect,
    pub status: Rect,
    pub slider: Rect,
    pub statusline: Rect,
    pub commandline: Rect,
}

impl AppLayout {
    pub fn new(rect: Rect, commandline_height: u16, show_slider: bool, show_status: bool) -> Self {
        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(100),
                Constraint::Length(if show_slider { 1 } else { 0 }),
                Constraint::Length(1),
                Constraint::Length(commandline_height),
            ])
            .split(rect);

        let ratios = if show_status {
            [(3, 5), (2, 5)]
        } else {
            [(1, 1), (0, 1)]
        };

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(Constraint::from_ratios(ratios))
            .split(main[0]);

        Self {
            graph: panes[0],
            status: panes[1],
            slider: main[1],
            statusline: main[2],
            commandline: main[3],
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CommandLineLayout {
    pub buffer: Rect,
    pub key_sequence: Rect,
}

impl CommandLineLayout {
    pub fn new(rect: Rect, key_sequence_length: u16) -> Self {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(100),
                Constraint::Length(key_sequence_length),
            ])
            .split(rect);

        Self {
            buffer: layout[0],
            key_sequence: layout[1],
        }
    }
}
