pub mod launcher;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::{HarnessError, Result};
use crate::wait::{wait_until, WaitConfig};

pub use launcher::NotebookLauncher;

/// Where the notebook server under test lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookServerInfo {
    pub url: String,
    pub token: Option<String>,
}

impl NotebookServerInfo {
    pub fn new(url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            url: url.into(),
            token,
        }
    }

    /// Prefix every file-tree URL starts with.
    pub fn tree_url(&self) -> String {
        url_path_join(&[&self.url, "tree"])
    }

    /// Tree URL to navigate to, carrying the token so the server sets its auth cookie.
    pub fn authenticated_tree_url(&self) -> Result<String> {
        let mut url = Url::parse(&self.tree_url())
            .map_err(|e| HarnessError::server(&self.url, format!("invalid server url: {e}")))?;
        if let Some(token) = &self.token {
            url.query_pairs_mut().append_pair("token", token);
        }
        Ok(url.to_string())
    }

    pub fn status_url(&self) -> String {
        url_path_join(&[&self.url, "api", "status"])
    }

    /// Returns true if the server answers its status endpoint.
    pub fn is_ready(&self, http: &Client) -> bool {
        let mut request = http.get(self.status_url());
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {token}"));
        }
        matches!(request.send(), Ok(resp) if resp.status().is_success())
    }

    /// Polls the status endpoint until the server answers or the wait times out.
    pub fn wait_until_ready(&self, wait: &WaitConfig) -> Result<()> {
        let http = Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .map_err(|e| HarnessError::server(&self.url, e.to_string()))?;

        match wait_until(wait, || Ok(self.is_ready(&http).then_some(())))? {
            Some(()) => {
                crate::logging::log_server_event(&self.url, "ready");
                Ok(())
            }
            None => Err(HarnessError::server(
                &self.url,
                format!(
                    "server did not answer {} within {}ms",
                    self.status_url(),
                    wait.timeout.as_millis()
                ),
            )),
        }
    }
}

/// Joins URL path pieces with single slashes.
///
/// A leading slash on the first piece and a trailing slash on the last piece are kept.
pub fn url_path_join(pieces: &[&str]) -> String {
    let Some(first) = pieces.first() else {
        return String::new();
    };
    let initial = first.starts_with('/');
    let trailing = pieces.last().is_some_and(|p| p.ends_with('/'));

    let mut result = pieces
        .iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if initial {
        result.insert(0, '/');
    }
    if trailing {
        result.push('/');
    }
    if result == "//" {
        result = "/".to_string();
    }
    result
}
