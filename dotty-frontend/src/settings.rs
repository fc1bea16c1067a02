use std::{path::PathBuf, time::Duration};

use url::Url;

use crate::{model::options::ViewOptions, params::DashboardParams};

#[derive(Debug)]
pub struct Settings {
    pub dashboard: Url,
    pub debug: u8,
    pub file: Option<String>,
    pub fragment: Option<String>,
    pub refresh: Duration,
    pub renderer: PathBuf,
    pub svg_output: Option<PathBuf>,
    pub view: ViewOptions,
}

impl Settings {
    /// Creates settings for the dashboard page at `dashboard`. File, debug
    /// level and refresh interval are taken from the page query.
    pub fn new(dashboard: Url) -> Self {
        let params = DashboardParams::from_query(dashboard.query());
        let fragment = dashboard.fragment().map(|it| it.to_owned());

        Self {
            dashboard,
            debug: params.debug,
            file: params.file,
            fragment,
            refresh: params.refresh,
            renderer: PathBuf::from("dot"),
            svg_output: None,
            view: ViewOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_reads_query_and_fragment() {
        let url = Url::parse("http://viz.local/index.html?file=dot/prod.dot&refresh=1000#/unit=mysql/0")
            .unwrap();

        let settings = Settings::new(url);

        assert_eq!(Some("dot/prod.dot".to_string()), settings.file);
        assert_eq!(Duration::from_secs(1), settings.refresh);
        assert_eq!(Some("/unit=mysql/0".to_string()), settings.fragment);
        assert_eq!(PathBuf::from("dot"), settings.renderer);
    }
}
