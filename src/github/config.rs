use crate::error::{Error, Result};
use std::env;
use std::time::Duration;
use url::Url;

const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub client configuration
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// Base URL of the REST API (overridable for tests and GitHub Enterprise)
    pub api_base_url: String,

    /// Connection establishment ceiling in seconds (default: 15)
    pub connect_timeout_secs: u64,

    /// Whole request ceiling in seconds (default: 15)
    pub request_timeout_secs: u64,

    pub user_agent: String,
}

impl GitHubConfig {
    /// Create a new GitHubConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let connect_timeout_secs = env::var("GITHUB_CONNECT_TIMEOUT")
            .ok()
            .map(|s| {
                s.parse()
                    .map_err(|_| Error::Config("Invalid GITHUB_CONNECT_TIMEOUT value".to_string()))
            })
            .transpose()?
            .unwrap_or(defaults.connect_timeout_secs);

        let request_timeout_secs = env::var("GITHUB_REQUEST_TIMEOUT")
            .ok()
            .map(|s| {
                s.parse()
                    .map_err(|_| Error::Config("Invalid GITHUB_REQUEST_TIMEOUT value".to_string()))
            })
            .transpose()?
            .unwrap_or(defaults.request_timeout_secs);

        Ok(Self {
            api_base_url: env::var("GITHUB_API_URL").unwrap_or(defaults.api_base_url),
            connect_timeout_secs,
            request_timeout_secs,
            user_agent: env::var("GITHUB_USER_AGENT").unwrap_or(defaults.user_agent),
        })
    }

    /// Point the client at another API root
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "GitHub API URL must use http or https: {}",
                self.api_base_url
            )));
        }

        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(Error::Config("Timeouts must be non-zero".to_string()));
        }

        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            connect_timeout_secs: 15,
            request_timeout_secs: 15,
            user_agent: format!("ios-repos/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
