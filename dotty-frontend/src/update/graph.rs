use dotty_history::{Ingested, RenderError};
use dotty_keymap::message::PrintContent;
use url::Url;

use crate::{
    action::{self, Action},
    model::Model,
    remote::{FetchError, Fetched},
    task::Task,
};

use super::{commandline, export};

/// Handles a poll result. New content is sent to the renderer first, only
/// timestamp changes are recorded right away.
#[tracing::instrument(skip(model, result))]
pub fn fetched(
    model: &mut Model,
    url: &Url,
    result: Result<Fetched, FetchError>,
) -> Vec<Action> {
    if model.files.current.as_ref() != Some(url) {
        tracing::debug!("dropping result of superseded poll");
        return Vec::new();
    }

    let fetched = match result {
        Ok(it) => it,
        Err(error) => {
            model.graph.fetch_status = error.status_text();
            return Vec::new();
        }
    };

    let observed_at = fetched.last_modified.as_deref();
    if model.store.needs_render(&fetched.body, observed_at) {
        return vec![action::task(Task::RenderGraph(url.clone(), fetched))];
    }

    if let Err(error) = model.store.ingest(&fetched.body, observed_at, None) {
        tracing::error!("recording unchanged graph failed: {}", error);
    }
    model.graph.fetch_status = format!("{} OK", fetched.status);

    Vec::new()
}

#[tracing::instrument(skip(model, fetched, result))]
pub fn rendered(
    model: &mut Model,
    url: &Url,
    fetched: Fetched,
    result: Result<String, RenderError>,
) -> Vec<Action> {
    if model.files.current.as_ref() != Some(url) {
        tracing::debug!("dropping render of superseded poll");
        return Vec::new();
    }

    let markup = match result {
        Ok(it) => it,
        Err(RenderError::Invalid(message)) => {
            tracing::warn!("rejected graph: {}", message);
            model.graph.fetch_status = format!("{} INVALID DOT", fetched.status);
            return Vec::new();
        }
        Err(error) => {
            model.graph.fetch_status = format!("{} INVALID DOT", fetched.status);
            return commandline::print(
                model,
                vec![PrintContent::Error(format!("Graph renderer failed: {}", error))],
            );
        }
    };

    let ingested = match model.store.ingest(
        &fetched.body,
        fetched.last_modified.as_deref(),
        Some(markup),
    ) {
        Ok(it) => it,
        Err(error) => {
            tracing::error!("storing rendered graph failed: {}", error);
            return Vec::new();
        }
    };

    model.graph.fetch_status = format!("{} OK", fetched.status);

    let displayed = match ingested {
        Ingested::Appended(_) => true,
        Ingested::Overwritten(index) => index == model.store.cursor().current,
        Ingested::Touched(_) | Ingested::Unchanged => false,
    };

    if displayed {
        export::displayed(model)
    } else {
        Vec::new()
    }
}

pub fn toggle_unit_details(model: &mut Model) -> Vec<Action> {
    model.graph.options.unit_details = !model.graph.options.unit_details;
    model.graph.scroll = 0;

    export::displayed(model)
}

pub fn set_rankdir(model: &mut Model, rankdir: Option<&str>) -> Vec<Action> {
    model.graph.options.rankdir = rankdir.map(str::to_owned);
    export::displayed(model)
}

pub fn set_size(model: &mut Model, size: Option<&str>) -> Vec<Action> {
    model.graph.options.size = size.map(str::to_owned);
    export::displayed(model)
}
