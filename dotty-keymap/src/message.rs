use std::fmt::Display;

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Mode {
    Command,
    #[default]
    Normal,
}

impl Mode {
    pub fn is_command(&self) -> bool {
        matches!(self, Mode::Command)
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Command => write!(f, "command"),
            Mode::Normal => write!(f, "normal"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KeySequence {
    Completed(String),
    Changed(String),
    None,
}

impl KeySequence {
    pub fn len_or_default(&self, default: usize) -> u16 {
        let len = match self {
            KeySequence::Completed(_) | KeySequence::None => default,
            KeySequence::Changed(sequence) => sequence.chars().count(),
        };
        len as u16
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KeymapMessage {
    ChangeMode(Mode, Mode),
    ClearStatus,
    CommandlineDelete,
    CommandlineInsert(String),
    CycleFile(CycleDirection),
    CycleLink(CycleDirection),
    ExecuteCommand,
    JumpHistory(HistoryJump),
    Print(Vec<PrintContent>),
    Quit,
    Reload,
    ResetHistory,
    ScrollGraph(ScrollDirection),
    StepHistory(isize),
    ToggleUnitDetails,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CycleDirection {
    Next,
    Previous,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HistoryJump {
    First,
    Last,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScrollDirection {
    Down,
    HalfPageDown,
    HalfPageUp,
    Up,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PrintContent {
    Error(String),
    Default(String),
    Information(String),
}
