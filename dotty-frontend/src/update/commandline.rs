use dotty_keymap::message::{Mode, PrintContent};

use crate::{
    action::{Action, PostAction},
    model::Model,
};

use super::command;

pub fn change_mode(model: &mut Model, from: Mode, to: Mode) -> Vec<Action> {
    if from == to {
        return Vec::new();
    }

    if to.is_command() {
        model.commandline.messages.clear();
    }
    model.commandline.text.clear();
    model.mode = to.clone();

    vec![Action::Post(PostAction::ModeChanged(to))]
}

pub fn insert(model: &mut Model, text: &str) -> Vec<Action> {
    model.commandline.text.push_str(text);
    Vec::new()
}

pub fn delete(model: &mut Model) -> Vec<Action> {
    if model.commandline.text.pop().is_none() {
        return change_mode(model, Mode::Command, Mode::Normal);
    }

    Vec::new()
}

pub fn execute(model: &mut Model) -> Vec<Action> {
    let cmd = std::mem::take(&mut model.commandline.text);

    let mut actions = change_mode(model, Mode::Command, Mode::Normal);
    actions.extend(command::execute(&cmd, model));
    actions
}

pub fn print(model: &mut Model, content: Vec<PrintContent>) -> Vec<Action> {
    model.commandline.messages = content;
    Vec::new()
}

/// Rows the command line needs. Multi line prints get an extra row so the
/// last line stays readable above the status line.
pub fn height(model: &Model) -> u16 {
    let messages = model.commandline.messages.len();
    if model.mode.is_command() || messages < 2 {
        1
    } else {
        u16::try_from(messages + 1).unwrap_or(u16::MAX)
    }
}
