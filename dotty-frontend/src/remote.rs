use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::{header::LAST_MODIFIED, Client};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::{error::AppError, listing};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Server responded with status {0}")]
    Status(u16),
    #[error("Response is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetchError {
    /// Short text shown in the status line. Network failures carry no code
    /// and render blank.
    pub fn status_text(&self) -> String {
        match self {
            FetchError::Network(_) => String::new(),
            FetchError::Status(code) => format!("{} ERROR", code),
            FetchError::Json(_) => "INVALID JSON".to_string(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fetched {
    pub body: String,
    pub last_modified: Option<String>,
    pub status: u16,
}

#[derive(Clone, Debug)]
pub struct Remote {
    client: Client,
}

impl Remote {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client })
    }

    pub async fn fetch_graph(&self, url: &Url) -> Result<Fetched, FetchError> {
        let response = self.client.get(cache_bust(url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_owned());

        let body = response.text().await?;

        tracing::trace!("fetched {} bytes from {}", body.len(), url);

        Ok(Fetched {
            body,
            last_modified,
            status: status.as_u16(),
        })
    }

    pub async fn fetch_listing(&self, url: &Url) -> Result<Vec<Url>, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        Ok(listing::parse(url, &html))
    }

    pub async fn fetch_status(&self, url: &Url) -> Result<Value, FetchError> {
        let response = self.client.get(cache_bust(url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Appends a `_cachebust` parameter carrying the current time in
/// milliseconds so intermediate caches never answer a poll.
pub fn cache_bust(url: &Url) -> Url {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|it| it.as_millis())
        .unwrap_or_default();

    let mut url = url.clone();
    url.query_pairs_mut()
        .append_pair("_cachebust", &millis.to_string());

    url
}

/// The status document lives next to the graph file with `.json` appended.
pub fn status_url(file: &Url) -> Url {
    let mut url = file.clone();
    url.set_path(&format!("{}.json", file.path()));
    url.set_query(None);
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_bust_appends_parameter() {
        let url = Url::parse("http://viz.local/dot/prod.dot").unwrap();

        let busted = cache_bust(&url);

        assert_eq!(url.path(), busted.path());
        let (key, value) = busted.query_pairs().next().unwrap();
        assert_eq!("_cachebust", key);
        assert!(value.parse::<u128>().is_ok());
    }

    #[test]
    fn cache_bust_keeps_existing_query() {
        let url = Url::parse("http://viz.local/dot/prod.dot?env=prod").unwrap();

        let busted = cache_bust(&url);

        let keys: Vec<_> = busted.query_pairs().map(|(key, _)| key.into_owned()).collect();
        assert_eq!(vec!["env", "_cachebust"], keys);
    }

    #[test]
    fn status_url_appends_json() {
        let url = Url::parse("http://viz.local/dot/prod.dot").unwrap();

        assert_eq!(
            "http://viz.local/dot/prod.dot.json",
            status_url(&url).as_str()
        );
    }

    #[test]
    fn status_text_by_error() {
        assert_eq!("404 ERROR", FetchError::Status(404).status_text());
    }
}
