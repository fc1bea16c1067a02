use crate::{
    action::{self, Action},
    model::Model,
    task::Task,
};

/// Writes the displayed snapshot to the configured svg file. Stored markup
/// is reused unless view options alter the source, in which case the
/// edited source is rendered again.
pub fn displayed(model: &Model) -> Vec<Action> {
    let path = match &model.graph.export {
        Some(it) => it.clone(),
        None => return Vec::new(),
    };

    let snapshot = match model.store.current() {
        Some(it) => it,
        None => return Vec::new(),
    };

    let task = if model.graph.options.is_default() {
        Task::ExportSvg(path, snapshot.markup().to_owned())
    } else {
        let source = model.graph.options.apply(snapshot.raw()).into_owned();
        Task::RenderSvg(path, source)
    };

    vec![action::task(task)]
}
