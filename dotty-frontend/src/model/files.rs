use dotty_keymap::message::CycleDirection;
use url::Url;

/// Graph files offered for selection and the one currently polled.
#[derive(Debug, Default)]
pub struct FileSet {
    pub current: Option<Url>,
    pub list: Vec<Url>,
}

impl FileSet {
    pub fn position(&self) -> Option<usize> {
        let current = self.current.as_ref()?;
        self.list.iter().position(|url| url == current)
    }

    /// File next to the current one, wrapping at both ends. Without a
    /// current file in the list, cycling starts at the first entry.
    pub fn neighbour(&self, direction: CycleDirection) -> Option<&Url> {
        if self.list.is_empty() {
            return None;
        }

        let len = self.list.len();
        let index = match (self.position(), direction) {
            (None, _) => 0,
            (Some(index), CycleDirection::Next) => (index + 1) % len,
            (Some(index), CycleDirection::Previous) => (index + len - 1) % len,
        };

        self.list.get(index)
    }

    /// Looks up a file by list index or by the tail of its path.
    pub fn find(&self, reference: &str) -> Option<&Url> {
        if let Ok(index) = reference.parse::<usize>() {
            return self.list.get(index);
        }

        self.list
            .iter()
            .find(|url| url.path().ends_with(reference))
    }
}
