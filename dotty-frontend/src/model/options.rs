use std::borrow::Cow;

use regex::{Captures, Regex};

/// Edits applied to graph source before it is shown or exported.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ViewOptions {
    pub rankdir: Option<String>,
    pub size: Option<String>,
    pub unit_details: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            rankdir: None,
            size: None,
            unit_details: true,
        }
    }
}

impl ViewOptions {
    pub fn is_default(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply<'a>(&self, source: &'a str) -> Cow<'a, str> {
        if self.is_default() {
            return Cow::Borrowed(source);
        }

        let mut result = if self.unit_details {
            source.to_owned()
        } else {
            let regex = Regex::new(r"_tag|#unit").expect("Failed to compile regex");
            source
                .split('\n')
                .filter(|line| !regex.is_match(line))
                .collect::<Vec<_>>()
                .join("\n")
        };

        if let Some(rankdir) = &self.rankdir {
            let regex = Regex::new(r".*(digraph.*\{)").expect("Failed to compile regex");
            result = regex
                .replacen(&result, 1, |captures: &Captures| {
                    format!("{} rankdir=\"{}\";", &captures[1], rankdir)
                })
                .into_owned();
        }

        if let Some(size) = &self.size {
            let regex = Regex::new(r".*(digraph.*\{.*)").expect("Failed to compile regex");
            result = regex
                .replacen(&result, 1, |captures: &Captures| {
                    format!("{} size=\"{}\";", &captures[1], size)
                })
                .into_owned();
        }

        Cow::Owned(result)
    }
}
