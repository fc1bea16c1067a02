use std::{borrow::Cow, fmt::Debug};

use regex::Regex;

/// Reduces graph source to the part that decides whether two versions are
/// structurally different. Two sources with equal normalized text are
/// treated as cosmetic variants of each other.
pub trait Normalize: Debug + Send {
    fn normalize<'a>(&self, source: &'a str) -> Cow<'a, str>;
}

/// Collapses everything from a `tooltip=` attribute to the last `href=` on
/// the same line into a bare `href=`.
///
/// This is a heuristic tailored to generated status graphs, where tooltips
/// carry volatile detail text right before the link of a table cell. It is
/// not a graph equality check: reordered nodes or attributes still count as
/// structural changes.
#[derive(Debug)]
pub struct TooltipNormalizer {
    regex: Regex,
}

impl Default for TooltipNormalizer {
    fn default() -> Self {
        Self {
            regex: Regex::new(r"tooltip=.*href=").expect("Failed to compile regex"),
        }
    }
}

impl Normalize for TooltipNormalizer {
    fn normalize<'a>(&self, source: &'a str) -> Cow<'a, str> {
        self.regex.replace_all(source, "href=")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_tooltip_before_href() {
        let normalizer = TooltipNormalizer::default();
        let result = normalizer.normalize(r##"<td tooltip="unit: mysql/0" href="#unit=mysql/0">"##);

        assert_eq!(r##"<td href="#unit=mysql/0">"##, result);
    }

    #[test]
    fn normalize_keeps_lines_without_tooltip() {
        let normalizer = TooltipNormalizer::default();
        let source = "digraph \"prod\" {\n  \"a\" -> \"b\";\n}";

        assert!(matches!(normalizer.normalize(source), Cow::Borrowed(_)));
    }

    #[test]
    fn normalize_works_per_line() {
        let normalizer = TooltipNormalizer::default();
        let source = "tooltip=\"x\"\nhref=\"/a\"";

        assert_eq!(source, normalizer.normalize(source));
    }

    #[test]
    fn normalize_equal_for_tooltip_only_difference() {
        let normalizer = TooltipNormalizer::default();
        let old = r#"tooltip="X" href="/a""#;
        let new = r#"tooltip="Y" href="/a""#;

        assert_eq!(normalizer.normalize(old), normalizer.normalize(new));
    }

    #[test]
    fn normalize_differs_for_href_difference() {
        let normalizer = TooltipNormalizer::default();
        let old = r#"tooltip="X" href="/a""#;
        let new = r#"tooltip="X" href="/b""#;

        assert_ne!(normalizer.normalize(old), normalizer.normalize(new));
    }
}
