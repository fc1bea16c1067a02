use std::path::PathBuf;

use dotty_keymap::message::PrintContent;

use crate::{
    action::{Action, PostAction},
    model::Model,
};

use super::{commandline, export, files, graph, navigator, status};

#[tracing::instrument(skip(model))]
pub fn execute(cmd: &str, model: &mut Model) -> Vec<Action> {
    let cmd_with_args = match cmd.trim().split_once(' ') {
        Some((cmd, args)) => (cmd, args.trim()),
        None => (cmd.trim(), ""),
    };

    tracing::debug!("executing command: {:?}", cmd_with_args);

    match cmd_with_args {
        ("", "") => Vec::new(),
        ("details", "") => graph::toggle_unit_details(model),
        ("export", "") => match &model.graph.export {
            Some(_) => export::displayed(model),
            None => print_error(model, "export needs a target path"),
        },
        ("export", path) => {
            model.graph.export = Some(PathBuf::from(path));
            export::displayed(model)
        }
        ("file", "") => {
            let current = match &model.files.current {
                Some(url) => url.to_string(),
                None => "no file selected".to_string(),
            };
            commandline::print(model, vec![PrintContent::Information(current)])
        }
        ("file", reference) => files::open(model, reference),
        ("files", "") => files::print(model),
        ("q" | "quit", "") => vec![Action::Post(PostAction::Quit)],
        ("rankdir", "") => graph::set_rankdir(model, None),
        ("rankdir", rankdir) => graph::set_rankdir(model, Some(rankdir)),
        ("reload", "") => files::reload(model),
        ("reset", "") => navigator::reset(model),
        ("size", "") => graph::set_size(model, None),
        ("size", size) => graph::set_size(model, Some(size)),
        ("status", "") => status::clear(model),
        ("version", version) => match version.parse::<usize>() {
            Ok(version) => navigator::pin(model, version),
            Err(_) => print_error(model, "version needs a number"),
        },
        ("status", fragment) => status::navigate(model, fragment),
        ("links", "") => status::print_links(model),
        (cmd, args) => {
            let err = if args.is_empty() {
                format!("command '{}' is not valid", cmd)
            } else {
                format!("command '{} {}' is not valid", cmd, args)
            };
            print_error(model, &err)
        }
    }
}

fn print_error(model: &mut Model, error: &str) -> Vec<Action> {
    commandline::print(model, vec![PrintContent::Error(error.to_owned())])
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use dotty_keymap::message::PrintContent;

    use crate::{
        action::{self, Action, PostAction},
        task::Task,
        update::{command, test},
    };

    #[test]
    fn execute_quit_aliases() {
        let mut model = test::model();

        assert_eq!(vec![Action::Post(PostAction::Quit)], command::execute("q", &mut model));
        assert_eq!(vec![Action::Post(PostAction::Quit)], command::execute("quit", &mut model));
    }

    #[test]
    fn execute_unknown_prints_error() {
        let mut model = test::model();

        let actions = command::execute("frobnicate now", &mut model);

        assert!(actions.is_empty());
        assert_eq!(
            vec![PrintContent::Error(
                "command 'frobnicate now' is not valid".to_string()
            )],
            model.commandline.messages
        );
    }

    #[test]
    fn execute_export_sets_target() {
        let mut model = test::model_with_file("a.dot");
        test::ingest(&mut model, "digraph { a }");

        let actions = command::execute("export /tmp/graph.svg", &mut model);

        assert_eq!(Some(PathBuf::from("/tmp/graph.svg")), model.graph.export);
        assert_eq!(
            vec![action::task(Task::ExportSvg(
                PathBuf::from("/tmp/graph.svg"),
                "<svg>digraph { a }</svg>".to_string()
            ))],
            actions
        );
    }

    #[test]
    fn execute_export_without_target_fails() {
        let mut model = test::model();

        assert!(command::execute("export", &mut model).is_empty());
        assert_eq!(1, model.commandline.messages.len());
    }

    #[test]
    fn execute_rankdir_set_and_clear() {
        let mut model = test::model();

        command::execute("rankdir LR", &mut model);
        assert_eq!(Some("LR".to_string()), model.graph.options.rankdir);

        command::execute("rankdir", &mut model);
        assert_eq!(None, model.graph.options.rankdir);
    }

    #[test]
    fn execute_status_navigates() {
        let mut model = test::model_with_file("a.dot");

        let actions = command::execute("status /service=__all__", &mut model);

        assert_eq!(
            vec![action::task(Task::LoadStatus(
                test::url("a.dot.json"),
                "/service=__all__".to_string()
            ))],
            actions
        );
    }

    #[test]
    fn execute_version_pins_history() {
        let mut model = test::model_with_file("a.dot");
        for source in ["digraph { a }", "digraph { b }", "digraph { c }"] {
            test::ingest(&mut model, source);
        }

        command::execute("version 2", &mut model);
        assert_eq!(1, model.store.cursor().current);

        command::execute("version 9", &mut model);
        assert_eq!(1, model.store.cursor().current);

        command::execute("version x", &mut model);
        assert_eq!(1, model.commandline.messages.len());
    }

    #[test]
    fn execute_file_switches() {
        let mut model = test::model_with_file("a.dot");

        let actions = command::execute("file 2", &mut model);

        assert_eq!(Some(test::url("c.dot")), model.files.current);
        assert_eq!(
            vec![action::task(Task::PollGraph(test::url("c.dot")))],
            actions
        );
    }
}
