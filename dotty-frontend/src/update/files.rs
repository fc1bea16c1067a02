use dotty_history::VersionStore;
use dotty_keymap::message::{CycleDirection, PrintContent};
use url::Url;

use crate::{
    action::{self, Action},
    listing,
    model::{GraphView, Model, StatusOverlay},
    remote::FetchError,
    task::Task,
};

use super::{commandline, status};

pub fn listed(model: &mut Model, url: &Url, result: Result<Vec<Url>, FetchError>) -> Vec<Action> {
    let files = match result {
        Ok(it) => it,
        Err(error) => {
            tracing::warn!("listing {} failed: {}", url, error);
            return commandline::print(
                model,
                vec![PrintContent::Error(format!(
                    "Listing {} failed: {}",
                    url, error
                ))],
            );
        }
    };

    tracing::debug!("listing {} returned {} files", url, files.len());
    model.files.list = files;

    if model.files.current.is_some() {
        return Vec::new();
    }

    match model.files.list.first().cloned() {
        Some(first) => select(model, first),
        None => Vec::new(),
    }
}

/// Switches to `url`. History and view state of the previous file are
/// dropped and polling restarts for the new one.
pub fn select(model: &mut Model, url: Url) -> Vec<Action> {
    if model.files.current.as_ref() == Some(&url) {
        return Vec::new();
    }

    tracing::info!("selecting graph file {}", url);

    let initial = model.files.current.is_none();
    model.files.current = Some(url.clone());
    model.store = VersionStore::new(model.settings.debug);
    model.graph = GraphView {
        export: model.graph.export.take(),
        fetch_status: "loading...".to_string(),
        options: model.graph.options.clone(),
        ..Default::default()
    };

    let mut actions = vec![action::task(Task::PollGraph(url))];

    let pending = model.status.fragment.clone();
    match pending {
        Some(fragment) if initial => actions.extend(status::navigate(model, &fragment)),
        _ => model.status = StatusOverlay::default(),
    }

    actions
}

pub fn open(model: &mut Model, reference: &str) -> Vec<Action> {
    let url = match model.files.find(reference) {
        Some(it) => it.clone(),
        None => match listing::resolve_file(&model.settings.dashboard, reference) {
            Ok(it) => it,
            Err(error) => {
                return commandline::print(
                    model,
                    vec![PrintContent::Error(format!(
                        "File reference {} is invalid: {}",
                        reference, error
                    ))],
                );
            }
        },
    };

    select(model, url)
}

pub fn cycle(model: &mut Model, direction: CycleDirection) -> Vec<Action> {
    match model.files.neighbour(direction).cloned() {
        Some(url) => select(model, url),
        None => Vec::new(),
    }
}

/// Refreshes the file listing and restarts polling of the current file.
pub fn reload(model: &mut Model) -> Vec<Action> {
    let mut actions = Vec::new();
    match listing::listing_url(&model.settings.dashboard) {
        Ok(url) => actions.push(action::task(Task::ListFiles(url))),
        Err(error) => tracing::warn!("listing url is invalid: {}", error),
    }

    if let Some(current) = &model.files.current {
        model.graph.fetch_status = "loading...".to_string();
        actions.push(action::task(Task::PollGraph(current.clone())));
    }

    actions
}

pub fn print(model: &mut Model) -> Vec<Action> {
    let mut contents = vec![":files".to_string(), "Idx  File".to_string()];
    contents.extend(model.files.list.iter().enumerate().map(|(index, url)| {
        let marker = if model.files.current.as_ref() == Some(url) {
            "*"
        } else {
            " "
        };
        format!("{:<4}{}{}", index, marker, listing::file_name(url))
    }));

    let content = contents.into_iter().map(PrintContent::Default).collect();
    commandline::print(model, content)
}
