use crate::{
    normalize::{Normalize, TooltipNormalizer},
    render::AlertCounts,
};

/// One rendered observation of a graph source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Snapshot {
    raw: String,
    markup: String,
    observed_at: Option<String>,
    alerts: AlertCounts,
}

impl Snapshot {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn observed_at(&self) -> Option<&str> {
        self.observed_at.as_deref()
    }

    pub fn alerts(&self) -> &AlertCounts {
        &self.alerts
    }
}

/// Navigation state over the history. `current` always lies within
/// `floor..=ceiling`, `version` grows with every mutation of the store.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Cursor {
    pub floor: usize,
    pub ceiling: usize,
    pub current: usize,
    pub version: u64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Ingested {
    /// Structural change, a new snapshot was appended at the index.
    Appended(usize),
    /// Cosmetic change, the snapshot at the index was replaced.
    Overwritten(usize),
    /// Only the timestamp of the snapshot at the index changed.
    Touched(usize),
    Unchanged,
}

impl Ingested {
    pub fn is_changed(&self) -> bool {
        matches!(self, Ingested::Appended(_) | Ingested::Overwritten(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Graph source must be rendered before it is stored")]
    NotRendered,
}

enum Change {
    Unchanged,
    Touch(usize),
    Overwrite(usize),
    Append,
}

#[derive(Debug)]
pub struct VersionStore {
    cursor: Cursor,
    history: Vec<Snapshot>,
    normalizer: Box<dyn Normalize>,
    verbosity: u8,
}

impl Default for VersionStore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl VersionStore {
    /// A verbosity above 1 disables deduplication, every change appends.
    pub fn new(verbosity: u8) -> Self {
        Self {
            cursor: Cursor::default(),
            history: Vec::new(),
            normalizer: Box::new(TooltipNormalizer::default()),
            verbosity,
        }
    }

    pub fn with_normalizer(mut self, normalizer: impl Normalize + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn snapshot(&self, index: usize) -> Option<&Snapshot> {
        self.history.get(index)
    }

    /// The snapshot selected by the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.history.get(self.cursor.current)
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.history.last()
    }

    pub fn is_navigable(&self) -> bool {
        self.cursor.ceiling > self.cursor.floor
    }

    /// True if ingesting `raw` would store a new snapshot, which needs the
    /// rendered markup of `raw`.
    pub fn needs_render(&self, raw: &str, observed_at: Option<&str>) -> bool {
        matches!(
            self.assess(raw, observed_at),
            Change::Append | Change::Overwrite(_)
        )
    }

    /// Records an observation of `raw`. `markup` is the rendered form of
    /// `raw` and is only read when [`Self::needs_render`] holds.
    #[tracing::instrument(skip(self, raw, markup))]
    pub fn ingest(
        &mut self,
        raw: &str,
        observed_at: Option<&str>,
        markup: Option<String>,
    ) -> Result<Ingested, IngestError> {
        match self.assess(raw, observed_at) {
            Change::Unchanged => Ok(Ingested::Unchanged),
            Change::Touch(index) => {
                self.history[index].observed_at = observed_at.map(str::to_owned);

                tracing::trace!("touched snapshot {}", index);
                Ok(Ingested::Touched(index))
            }
            Change::Overwrite(index) => {
                let markup = markup.ok_or(IngestError::NotRendered)?;
                self.history[index] = create_snapshot(raw, observed_at, markup);
                self.cursor.version += 1;

                tracing::debug!("overwrote snapshot {}", index);
                Ok(Ingested::Overwritten(index))
            }
            Change::Append => {
                let markup = markup.ok_or(IngestError::NotRendered)?;
                self.history.push(create_snapshot(raw, observed_at, markup));

                let index = self.history.len() - 1;
                self.cursor.ceiling = index;
                self.cursor.current = index;
                self.cursor.version += 1;

                tracing::debug!("appended snapshot {}", index);
                Ok(Ingested::Appended(index))
            }
        }
    }

    fn assess(&self, raw: &str, observed_at: Option<&str>) -> Change {
        let last = match self.history.last() {
            Some(it) => it,
            None => return Change::Append,
        };

        if last.raw == raw && last.observed_at.as_deref() == observed_at {
            return Change::Unchanged;
        }

        let structural = self.verbosity > 1
            || self.normalizer.normalize(raw) != self.normalizer.normalize(&last.raw);

        let index = self.history.len() - 1;
        if structural {
            Change::Append
        } else if last.raw != raw {
            Change::Overwrite(index)
        } else {
            Change::Touch(index)
        }
    }

    /// Pins the cursor to `index`. Returns false and leaves the store
    /// untouched if the index is out of range or already selected.
    pub fn set_current(&mut self, index: usize) -> bool {
        if self.history.is_empty()
            || index < self.cursor.floor
            || index > self.cursor.ceiling
            || index == self.cursor.current
        {
            return false;
        }

        self.cursor.current = index;
        self.cursor.version += 1;
        true
    }

    pub fn step(&mut self, delta: isize) -> bool {
        match self.cursor.current.checked_add_signed(delta) {
            Some(index) => self.set_current(index),
            None => false,
        }
    }

    pub fn first(&mut self) -> bool {
        self.set_current(self.cursor.floor)
    }

    pub fn last(&mut self) -> bool {
        self.set_current(self.cursor.ceiling)
    }

    /// Drops everything but the most recent snapshot.
    pub fn reset(&mut self) {
        if let Some(latest) = self.history.pop() {
            self.history.clear();
            self.history.push(latest);
        }

        self.cursor = Cursor {
            version: self.cursor.version + 1,
            ..Default::default()
        };
    }
}

fn create_snapshot(raw: &str, observed_at: Option<&str>, markup: String) -> Snapshot {
    Snapshot {
        raw: raw.to_owned(),
        markup,
        observed_at: observed_at.map(str::to_owned),
        alerts: AlertCounts::from_source(raw),
    }
}
