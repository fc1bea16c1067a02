use action::ActionResult;
use dotty_history::Graphviz;
use error::AppError;
use event::Emitter;
use layout::{AppLayout, CommandLineLayout};
use model::Model;
use remote::Remote;
use settings::Settings;
use terminal::TerminalWrapper;
use update::update_model;
use view::render_model;

mod action;
pub mod error;
mod event;
mod layout;
mod listing;
mod model;
pub mod params;
mod remote;
pub mod settings;
mod status;
mod task;
mod terminal;
mod update;
mod view;

pub async fn run(settings: Settings) -> Result<(), AppError> {
    let remote = Remote::new()?;
    let renderer = Graphviz::new(settings.renderer.clone());

    let mut terminal = TerminalWrapper::start()?;
    let mut emitter = Emitter::start(remote, renderer, settings.refresh);

    let mut model = Model::new(settings);
    tracing::debug!("starting with model state: {:?}", model);

    let mut result = Vec::new();

    let actions = update::startup(&mut model);
    set_layout(&mut model, &terminal, 0)?;

    let remaining = action::exec_preview(&mut terminal, actions)?;
    render_model(&mut terminal, &model)?;
    action::exec_postview(&mut emitter, remaining).await;

    while let Some(envelope) = emitter.receiver.recv().await {
        tracing::debug!("received messages: {:?}", envelope.messages);

        let sequence_len = envelope
            .sequence
            .len_or_default(model.key_sequence.chars().count());

        let actions = update_model(&mut model, envelope);

        let remaining = match action::exec_preview(&mut terminal, actions) {
            Ok(it) => it,
            Err(error) => {
                result.push(error);
                break;
            }
        };

        set_layout(&mut model, &terminal, sequence_len)?;
        render_model(&mut terminal, &model)?;

        if action::exec_postview(&mut emitter, remaining).await == ActionResult::Quit {
            break;
        }
    }

    if let Err(error) = emitter.shutdown().await {
        result.push(error);
    }

    terminal.shutdown()?;

    if result.is_empty() {
        Ok(())
    } else {
        Err(AppError::Aggregate(result))
    }
}

fn set_layout(
    model: &mut Model,
    terminal: &TerminalWrapper,
    sequence_len: u16,
) -> Result<(), AppError> {
    let size = terminal.size()?;
    model.layout = AppLayout::new(
        size,
        update::commandline_height(model),
        model.store.is_navigable(),
        model.status.is_visible(),
    );
    model.commandline.layout = CommandLineLayout::new(model.layout.commandline, sequence_len);

    Ok(())
}
