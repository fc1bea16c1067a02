use dotty_keymap::message::Mode;

use crate::{error::AppError, event::Emitter, task::Task, terminal::TerminalWrapper};

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    PreView(PreViewAction),
    Post(PostAction),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PreViewAction {
    Resize(u16, u16),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PostAction {
    ModeChanged(Mode),
    Quit,
    Task(Task),
}

#[derive(Debug, PartialEq)]
pub enum ActionResult {
    Normal,
    Quit,
}

pub fn task(task: Task) -> Action {
    Action::Post(PostAction::Task(task))
}

pub fn exec_preview(
    terminal: &mut TerminalWrapper,
    actions: Vec<Action>,
) -> Result<Vec<PostAction>, AppError> {
    let mut remaining = Vec::new();
    for action in actions {
        match action {
            Action::PreView(PreViewAction::Resize(x, y)) => terminal.resize(x, y)?,
            Action::Post(post) => remaining.push(post),
        }
    }

    Ok(remaining)
}

pub async fn exec_postview(emitter: &mut Emitter, actions: Vec<PostAction>) -> ActionResult {
    let mut result = ActionResult::Normal;
    for action in actions {
        match action {
            PostAction::ModeChanged(mode) => emitter.set_current_mode(mode).await,
            PostAction::Quit => result = ActionResult::Quit,
            PostAction::Task(task) => emitter.run(task),
        }
    }

    result
}
