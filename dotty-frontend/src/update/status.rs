use dotty_keymap::message::{CycleDirection, PrintContent};
use serde_json::Value;
use url::Url;

use crate::{
    action::{self, Action},
    model::{Model, StatusOverlay},
    remote::{self, FetchError},
    status::{self, Fragment},
    task::Task,
};

use super::commandline;

/// Opens the status pane for `fragment`. Unrecognized fragments close the
/// pane. Without a current file the fragment is kept until one is selected.
pub fn navigate(model: &mut Model, fragment: &str) -> Vec<Action> {
    if Fragment::parse(fragment).is_none() {
        tracing::debug!("ignoring unrecognized status fragment {:?}", fragment);
        return clear(model);
    }

    model.status = StatusOverlay {
        fragment: Some(fragment.to_owned()),
        text: None,
    };

    match &model.files.current {
        Some(file) => vec![action::task(Task::LoadStatus(
            remote::status_url(file),
            fragment.to_owned(),
        ))],
        None => Vec::new(),
    }
}

pub fn loaded(
    model: &mut Model,
    url: &Url,
    fragment: &str,
    result: Result<Value, FetchError>,
) -> Vec<Action> {
    let expected = model.files.current.as_ref().map(remote::status_url);
    if model.status.fragment.as_deref() != Some(fragment) || expected.as_ref() != Some(url) {
        tracing::debug!("dropping superseded status for {:?}", fragment);
        return Vec::new();
    }

    let document = match result {
        Ok(it) => it,
        Err(error) => {
            tracing::warn!("loading status {} failed: {}", url, error);
            return clear(model);
        }
    };

    let subtree = Fragment::parse(fragment).and_then(|it| status::select(&document, &it));
    match subtree {
        Some(subtree) => {
            model.status.text = Some(status::highlight(&document, subtree));
            Vec::new()
        }
        None => clear(model),
    }
}

pub fn clear(model: &mut Model) -> Vec<Action> {
    model.status = StatusOverlay::default();
    Vec::new()
}

fn displayed_links(model: &Model) -> Vec<String> {
    match model.store.current() {
        Some(snapshot) => status::links(&model.graph.options.apply(snapshot.raw())),
        None => Vec::new(),
    }
}

pub fn print_links(model: &mut Model) -> Vec<Action> {
    let mut contents = vec![":links".to_string()];
    contents.extend(displayed_links(model));

    let content = contents.into_iter().map(PrintContent::Default).collect();
    commandline::print(model, content)
}

/// Moves to the next status link of the displayed graph and opens it.
pub fn cycle_link(model: &mut Model, direction: CycleDirection) -> Vec<Action> {
    let links = displayed_links(model);

    if links.is_empty() {
        return commandline::print(
            model,
            vec![PrintContent::Information("graph has no status links".to_string())],
        );
    }

    let len = links.len();
    let index = match (model.graph.link, direction) {
        (None, CycleDirection::Next) => 0,
        (None, CycleDirection::Previous) => len - 1,
        (Some(index), CycleDirection::Next) => (index.min(len - 1) + 1) % len,
        (Some(index), CycleDirection::Previous) => (index.min(len - 1) + len - 1) % len,
    };

    model.graph.link = Some(index);
    navigate(model, &links[index])
}
