use crate::{error::AppError, model::Model, terminal::TerminalWrapper};

mod commandline;
mod graph;
mod slider;
mod status;
mod statusline;

pub fn render_model(terminal: &mut TerminalWrapper, model: &Model) -> Result<(), AppError> {
    terminal.draw(|frame| {
        let layout = model.layout.clone();

        graph::view(model, frame, layout.graph);

        if model.status.is_visible() {
            status::view(model, frame, layout.status);
        }

        if model.store.is_navigable() {
            slider::view(model, frame, layout.slider);
        }

        statusline::view(model, frame, layout.statusline);
        commandline::view(model, frame);
    })
}
