use crate::error::{Error, Result, ServiceError, ServiceResult};
use crate::github::{
    config::GitHubConfig,
    models::{FileContent, Repository, SearchPage},
};
use crate::utils::form_codec;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};
use url::Url;

/// Topic the repository list is restricted to
pub const SEARCH_TOPIC: &str = "iOS";

const README_PATH: &str = "README.md";

/// GitHub API client
///
/// All requests made through one client (and its clones) share a single
/// connection pool and go out one at a time, in call order.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: Url,
    in_flight: Arc<Mutex<()>>,
}

struct RawResponse {
    status: StatusCode,
    body: String,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(config: GitHubConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::Config(format!("Invalid user agent: {e}")))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.api_base_url)?,
            in_flight: Arc::new(Mutex::new(())),
        })
    }

    /// List one page of iOS repositories, most starred first.
    ///
    /// `page` is 1-based. Items come back in server order.
    pub async fn list(&self, page: u32) -> ServiceResult<Vec<Repository>> {
        if page == 0 {
            return Err(ServiceError::Request("Page numbers start at 1".to_string()));
        }

        let page = page.to_string();
        let params = BTreeMap::from([
            ("q", SEARCH_TOPIC),
            ("sort", "stars"),
            ("order", "desc"),
            ("page", page.as_str()),
        ]);

        let query = form_codec::encode(&params)?;
        let mut url = self.endpoint(&["search", "repositories"])?;
        url.set_query(Some(query.as_str()));

        let response = self.fetch(url).await?;

        match response.status {
            StatusCode::OK => {
                let search: SearchPage<Repository> = decode_body(&response.body)?;
                if search.incomplete_results {
                    debug!(
                        "GitHub search results incomplete (page {}, total {})",
                        page, search.total_count
                    );
                }
                Ok(search.items)
            }
            StatusCode::FORBIDDEN => Err(ServiceError::ApiLimitReached),
            status => Err(unexpected_status(status, &response.body)),
        }
    }

    /// Fetch the README text of `owner/name`
    pub async fn get_readme(&self, owner: &str, name: &str) -> ServiceResult<String> {
        if owner.is_empty() || name.is_empty() {
            return Err(ServiceError::Request(
                "Repository owner and name cannot be empty".to_string(),
            ));
        }

        let url = self.endpoint(&["repos", owner, name, "contents", README_PATH])?;
        let response = self.fetch(url).await?;

        match response.status {
            StatusCode::OK => {
                let file: FileContent = decode_body(&response.body)?;
                debug!("Fetched {} ({} bytes, sha {})", file.name, file.size, file.sha);
                Ok(file.content)
            }
            StatusCode::FORBIDDEN => Err(ServiceError::ApiLimitReached),
            StatusCode::NOT_FOUND => Err(ServiceError::NotFound),
            status => Err(unexpected_status(status, &response.body)),
        }
    }

    /// Fetch the README of a repository from a previous listing
    pub async fn get_readme_for(&self, repository: &Repository) -> ServiceResult<String> {
        self.get_readme(repository.owner().login(), repository.name()).await
    }

    fn endpoint(&self, segments: &[&str]) -> ServiceResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::Request(format!("Cannot build URL from {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a GET request and read the whole body.
    ///
    /// Holds the in-flight gate until the body is read, so at most one
    /// request per client is on the wire. The gate is FIFO.
    async fn fetch(&self, url: Url) -> ServiceResult<RawResponse> {
        let _in_flight = self.in_flight.lock().await;
        debug!("GitHub API request: GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_builder() {
                ServiceError::Request(format!("Failed to build request: {e}"))
            } else {
                warn!("GitHub API request failed: {}", e);
                ServiceError::Network(format!("GitHub API request failed: {e}"))
            }
        })?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            let remaining = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            warn!("GitHub API rate limit reached (remaining: {})", remaining);
        }

        let body = response.text().await.map_err(|e| {
            warn!("Failed to read GitHub API response: {}", e);
            ServiceError::Network(format!("Failed to read response body: {e}"))
        })?;

        Ok(RawResponse { status, body })
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> ServiceResult<T> {
    serde_json::from_str(body).map_err(|e| {
        error!("Failed to parse GitHub API response: {}", e);
        ServiceError::Response(format!("Failed to parse GitHub API response: {e}"))
    })
}

fn unexpected_status(status: StatusCode, body: &str) -> ServiceError {
    error!("GitHub API error: {} - {}", status, body);
    ServiceError::Response(format!("GitHub API error: {status}"))
}
