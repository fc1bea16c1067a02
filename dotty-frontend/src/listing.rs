use regex::Regex;
use url::Url;

/// Directory holding the graph files, relative to the dashboard page: the
/// last path segment is replaced by `dot/`.
pub fn listing_url(dashboard: &Url) -> Result<Url, url::ParseError> {
    dashboard.join("dot/")
}

/// Resolves a file reference from the query or command line against the
/// dashboard page.
pub fn resolve_file(dashboard: &Url, file: &str) -> Result<Url, url::ParseError> {
    dashboard.join(file)
}

/// Collects links to `.dot` files from a html directory index. Links are
/// resolved against the listing and kept in document order without
/// duplicates.
pub fn parse(base: &Url, html: &str) -> Vec<Url> {
    let regex = Regex::new(r#"(?i)href\s*=\s*["']([^"']+)["']"#).expect("Failed to compile regex");

    let mut files: Vec<Url> = Vec::new();
    for captures in regex.captures_iter(html) {
        let href = &captures[1];
        if !href.ends_with(".dot") {
            continue;
        }

        match base.join(href) {
            Ok(url) => {
                if !files.contains(&url) {
                    files.push(url);
                }
            }
            Err(error) => tracing::warn!("skipping invalid listing entry {}: {}", href, error),
        }
    }

    files
}

/// Name shown for a graph file: its last path segment.
pub fn file_name(url: &Url) -> &str {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .unwrap_or_else(|| url.as_str())
}
