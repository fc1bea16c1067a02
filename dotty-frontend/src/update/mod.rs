use dotty_keymap::message::{KeySequence, KeymapMessage, PrintContent};

use crate::{
    action::{self, Action, PostAction, PreViewAction},
    event::{Envelope, Message, MessageSource},
    listing,
    model::Model,
    task::Task,
};

mod command;
mod commandline;
mod export;
mod files;
mod graph;
mod navigator;
mod status;
mod viewport;

pub use commandline::height as commandline_height;

/// Actions needed to bring up the dashboard: the file listing, the
/// configured file and the status fragment given on startup.
pub fn startup(model: &mut Model) -> Vec<Action> {
    let mut actions = Vec::new();
    match listing::listing_url(&model.settings.dashboard) {
        Ok(url) => actions.push(action::task(Task::ListFiles(url))),
        Err(error) => {
            commandline::print(
                model,
                vec![PrintContent::Error(format!("Listing url is invalid: {}", error))],
            );
        }
    }

    if let Some(file) = model.settings.file.clone() {
        actions.extend(files::open(model, &file));
    }

    if let Some(fragment) = model.settings.fragment.clone() {
        actions.extend(status::navigate(model, &fragment));
    }

    actions
}

#[tracing::instrument(skip(model, envelope))]
pub fn update_model(model: &mut Model, envelope: Envelope) -> Vec<Action> {
    match &envelope.sequence {
        KeySequence::Completed(_) => model.key_sequence.clear(),
        KeySequence::Changed(sequence) => model.key_sequence = sequence.to_owned(),
        KeySequence::None => {}
    };

    if envelope.source == MessageSource::User && model.commandline.messages.len() > 1 {
        model.commandline.messages.clear();
    }

    envelope
        .messages
        .into_iter()
        .flat_map(|message| update_with_message(model, message))
        .collect()
}

fn update_with_message(model: &mut Model, message: Message) -> Vec<Action> {
    match message {
        Message::Keymap(msg) => update_with_keymap_message(model, msg),
        Message::Error(error) => commandline::print(model, vec![PrintContent::Error(error)]),
        Message::FilesListed(url, result) => files::listed(model, &url, result),
        Message::GraphFetched(url, result) => graph::fetched(model, &url, result),
        Message::GraphRendered(url, fetched, result) => {
            graph::rendered(model, &url, fetched, result)
        }
        Message::Resize(x, y) => vec![Action::PreView(PreViewAction::Resize(x, y))],
        Message::StatusLoaded(url, fragment, result) => {
            status::loaded(model, &url, &fragment, result)
        }
    }
}

fn update_with_keymap_message(model: &mut Model, msg: KeymapMessage) -> Vec<Action> {
    match msg {
        KeymapMessage::ChangeMode(from, to) => commandline::change_mode(model, from, to),
        KeymapMessage::ClearStatus => {
            model.commandline.messages.clear();
            status::clear(model)
        }
        KeymapMessage::CommandlineDelete => commandline::delete(model),
        KeymapMessage::CommandlineInsert(text) => commandline::insert(model, &text),
        KeymapMessage::CycleFile(direction) => files::cycle(model, direction),
        KeymapMessage::CycleLink(direction) => status::cycle_link(model, direction),
        KeymapMessage::ExecuteCommand => commandline::execute(model),
        KeymapMessage::JumpHistory(jump) => navigator::jump(model, jump),
        KeymapMessage::Print(content) => commandline::print(model, content),
        KeymapMessage::Quit => vec![Action::Post(PostAction::Quit)],
        KeymapMessage::Reload => files::reload(model),
        KeymapMessage::ResetHistory => navigator::reset(model),
        KeymapMessage::ScrollGraph(direction) => viewport::scroll(model, direction),
        KeymapMessage::StepHistory(delta) => navigator::step(model, delta),
        KeymapMessage::ToggleUnitDetails => graph::toggle_unit_details(model),
    }
}

#[cfg(test)]
pub(crate) mod test {
    use dotty_history::RenderError;
    use url::Url;

    use crate::{
        action::{Action, PostAction},
        model::Model,
        remote::{FetchError, Fetched},
        settings::Settings,
        task::Task,
    };

    use super::graph;

    /// Stands in for graphviz: wraps the source in svg and rejects anything
    /// without a `digraph` header.
    pub fn svg(source: &str) -> Result<String, RenderError> {
        if source.contains("digraph") {
            Ok(format!("<svg>{}</svg>", source))
        } else {
            Err(RenderError::Invalid("syntax error".to_string()))
        }
    }

    pub fn ingest(model: &mut Model, source: &str) {
        let markup = if model.store.needs_render(source, None) {
            Some(svg(source).unwrap())
        } else {
            None
        };

        model.store.ingest(source, None, markup).unwrap();
    }

    /// Runs a poll result through update, answering render requests the way
    /// the render task would.
    pub fn poll(
        model: &mut Model,
        name: &str,
        result: Result<Fetched, FetchError>,
    ) -> Vec<Action> {
        graph::fetched(model, &url(name), result)
            .into_iter()
            .flat_map(|action| match action {
                Action::Post(PostAction::Task(Task::RenderGraph(url, fetched))) => {
                    let result = svg(&fetched.body);
                    graph::rendered(model, &url, fetched, result)
                }
                other => vec![other],
            })
            .collect()
    }

    pub fn url(name: &str) -> Url {
        Url::parse(&format!("http://viz.local/juju/dot/{}", name)).unwrap()
    }

    pub fn model() -> Model {
        let settings = Settings::new(Url::parse("http://viz.local/juju/index.html").unwrap());
        Model::new(settings)
    }

    pub fn model_with_file(name: &str) -> Model {
        let mut model = model();
        model.files.list = vec![url("a.dot"), url("b.dot"), url("c.dot")];
        model.files.current = Some(url(name));
        model
    }

    pub fn fetched(body: &str, last_modified: Option<&str>) -> Result<Fetched, FetchError> {
        Ok(Fetched {
            body: body.to_string(),
            last_modified: last_modified.map(str::to_string),
            status: 200,
        })
    }
}
