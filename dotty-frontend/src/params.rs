use std::time::Duration;

pub const DEFAULT_REFRESH_MS: u64 = 300_000;

/// Reads the first value of `name` from a query string. Values are percent
/// decoded with `+` read as space. Returns `default` if the name is absent.
pub fn get_param(query: &str, name: &str, default: &str) -> String {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| default.to_owned())
}

/// Dashboard configuration carried by the query string. The refresh
/// interval is given in milliseconds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DashboardParams {
    pub debug: u8,
    pub file: Option<String>,
    pub refresh: Duration,
}

impl Default for DashboardParams {
    fn default() -> Self {
        Self {
            debug: 0,
            file: None,
            refresh: Duration::from_millis(DEFAULT_REFRESH_MS),
        }
    }
}

impl DashboardParams {
    pub fn from_query(query: Option<&str>) -> Self {
        let query = match query {
            Some(it) => it,
            None => return Self::default(),
        };

        let file = get_param(query, "file", "");
        let file = file.trim_end_matches('/');

        let debug_raw = get_param(query, "debug", "0");
        let debug = debug_raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("ignoring invalid debug parameter: {:?}", debug_raw);
            0
        });

        let refresh_raw = get_param(query, "refresh", &DEFAULT_REFRESH_MS.to_string());
        let refresh = refresh_raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("ignoring invalid refresh parameter: {:?}", refresh_raw);
            DEFAULT_REFRESH_MS
        });

        Self {
            debug,
            file: if file.is_empty() {
                None
            } else {
                Some(file.to_owned())
            },
            refresh: refresh_interval(refresh),
        }
    }
}

/// Poll interval for `millis`. Zero would poll without pause, so it falls
/// back to the default.
pub fn refresh_interval(millis: u64) -> Duration {
    if millis == 0 {
        tracing::warn!("ignoring refresh of 0 ms, using {} ms", DEFAULT_REFRESH_MS);
        return Duration::from_millis(DEFAULT_REFRESH_MS);
    }

    Duration::from_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_param_decodes_value() {
        let query = "file=dot%2Fweb%20prod.dot&debug=1";

        assert_eq!("dot/web prod.dot", get_param(query, "file", ""));
    }

    #[test]
    fn get_param_plus_is_space() {
        assert_eq!("a b", get_param("?title=a+b", "title", ""));
    }

    #[test]
    fn get_param_default_when_absent() {
        assert_eq!("42", get_param("file=x.dot", "refresh", "42"));
    }

    #[test]
    fn get_param_first_value_wins() {
        assert_eq!("1", get_param("debug=1&debug=2", "debug", "0"));
    }

    #[test]
    fn get_param_does_not_match_suffix() {
        assert_eq!("none", get_param("xfile=a.dot", "file", "none"));
    }

    #[test]
    fn from_query_defaults() {
        let params = DashboardParams::from_query(None);

        assert_eq!(DashboardParams::default(), params);
        assert_eq!(Duration::from_secs(300), params.refresh);
    }

    #[test]
    fn from_query_parses_values() {
        let params = DashboardParams::from_query(Some("file=/viz/dot/prod.dot/&debug=2&refresh=5000"));

        assert_eq!(Some("/viz/dot/prod.dot".to_string()), params.file);
        assert_eq!(2, params.debug);
        assert_eq!(Duration::from_millis(5000), params.refresh);
    }

    #[test]
    fn from_query_invalid_numbers_fall_back() {
        let params = DashboardParams::from_query(Some("debug=loud&refresh=soon"));

        assert_eq!(0, params.debug);
        assert_eq!(Duration::from_millis(DEFAULT_REFRESH_MS), params.refresh);
    }

    #[test]
    fn from_query_invalid_debug_keeps_other_values() {
        let params = DashboardParams::from_query(Some("debug=-1&refresh=2000&file=a.dot"));

        assert_eq!(0, params.debug);
        assert_eq!(Duration::from_millis(2000), params.refresh);
        assert_eq!(Some("a.dot".to_string()), params.file);
    }

    #[test]
    fn from_query_zero_refresh_falls_back() {
        let params = DashboardParams::from_query(Some("refresh=0"));

        assert_eq!(Duration::from_millis(DEFAULT_REFRESH_MS), params.refresh);
    }

    #[test]
    fn refresh_interval_keeps_positive_values() {
        assert_eq!(Duration::from_millis(1), refresh_interval(1));
        assert_eq!(
            Duration::from_millis(DEFAULT_REFRESH_MS),
            refresh_interval(0)
        );
    }

    #[test]
    fn from_query_empty_file_is_none() {
        let params = DashboardParams::from_query(Some("file="));

        assert_eq!(None, params.file);
    }
}
