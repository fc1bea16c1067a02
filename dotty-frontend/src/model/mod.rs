use std::path::PathBuf;

use dotty_history::VersionStore;
use dotty_keymap::message::{Mode, PrintContent};

use crate::{
    layout::{AppLayout, CommandLineLayout},
    settings::Settings,
    status::StatusText,
};

use self::{files::FileSet, options::ViewOptions};

pub mod files;
pub mod options;

#[derive(Debug)]
pub struct Model {
    pub commandline: CommandLine,
    pub files: FileSet,
    pub graph: GraphView,
    pub key_sequence: String,
    pub layout: AppLayout,
    pub mode: Mode,
    pub settings: Settings,
    pub status: StatusOverlay,
    pub store: VersionStore,
}

impl Model {
    pub fn new(settings: Settings) -> Self {
        let graph = GraphView {
            export: settings.svg_output.clone(),
            options: settings.view.clone(),
            ..Default::default()
        };

        Self {
            commandline: CommandLine::default(),
            files: FileSet::default(),
            graph,
            key_sequence: String::new(),
            layout: AppLayout::default(),
            mode: Mode::default(),
            store: VersionStore::new(settings.debug),
            settings,
            status: StatusOverlay::default(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CommandLine {
    pub layout: CommandLineLayout,
    pub messages: Vec<PrintContent>,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct GraphView {
    pub export: Option<PathBuf>,
    pub fetch_status: String,
    pub link: Option<usize>,
    pub options: ViewOptions,
    pub scroll: u16,
}

/// Detail pane showing the status subtree a graph link points to. The
/// fragment is kept while the status document loads, text stays empty
/// until then.
#[derive(Debug, Default)]
pub struct StatusOverlay {
    pub fragment: Option<String>,
    pub text: Option<StatusText>,
}

impl StatusOverlay {
    pub fn is_visible(&self) -> bool {
        self.fragment.is_some()
    }
}
