use base64::Engine;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use url::Url;

/// Failure to turn a contents API payload into text
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Cannot base64 decode content: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Cannot decode content as UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Owner of a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryUser {
    id: i64,
    login: String,
    #[serde(rename = "html_url")]
    profile_url: Url,
}

impl RepositoryUser {
    pub fn new(id: i64, login: impl Into<String>, profile_url: Url) -> Self {
        Self {
            id,
            login: login.into(),
            profile_url,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn profile_url(&self) -> &Url {
        &self.profile_url
    }
}

/// GitHub repository as returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    id: i64,
    name: String,
    full_name: String,
    html_url: Url,
    #[serde(rename = "stargazers_count")]
    stars_count: i64,
    #[serde(rename = "watchers_count")]
    watcher_count: i64,
    #[serde(rename = "forks_count")]
    fork_count: i64,
    owner: RepositoryUser,
}

impl Repository {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        name: impl Into<String>,
        full_name: impl Into<String>,
        html_url: Url,
        stars_count: i64,
        watcher_count: i64,
        fork_count: i64,
        owner: RepositoryUser,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            full_name: full_name.into(),
            html_url,
            stars_count,
            watcher_count,
            fork_count,
            owner,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Conventionally `owner/name`
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn html_url(&self) -> &Url {
        &self.html_url
    }

    pub fn stars_count(&self) -> i64 {
        self.stars_count
    }

    pub fn watcher_count(&self) -> i64 {
        self.watcher_count
    }

    pub fn fork_count(&self) -> i64 {
        self.fork_count
    }

    pub fn owner(&self) -> &RepositoryUser {
        &self.owner
    }
}

/// One page of a GitHub search response
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage<T> {
    pub total_count: i64,
    /// Set when the search timed out upstream and the results are partial
    pub incomplete_results: bool,
    pub items: Vec<T>,
}

/// File content from the GitHub contents API
///
/// `content` holds the decoded text; the wire value is base64.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileContent {
    pub name: String,
    pub sha: String,
    pub size: i64,
    #[serde(deserialize_with = "deserialize_base64_text")]
    pub content: String,
}

fn deserialize_base64_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded = String::deserialize(deserializer)?;
    decode_base64_text(&encoded).map_err(serde::de::Error::custom)
}

/// Decode base64 text as returned by GitHub (wrapped with newlines).
pub fn decode_base64_text(encoded: &str) -> Result<String, ContentError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = base64::engine::general_purpose::STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}
