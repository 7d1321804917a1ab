//! GitHub Releases API release source

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, USER_AGENT};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::config::{DEFAULT_GITHUB_API_URL, GitHubConfig};
use crate::release::error::ReleaseSourceError;
use crate::release::source::ReleaseSource;
use crate::release::types::{ReleaseRecord, Repository};

/// Upper bound on pages requested for a single repository
const MAX_PAGES: u32 = 100;

/// Release source backed by the GitHub Releases API
pub struct GitHubReleaseSource {
    client: reqwest::Client,
    base_url: String,
    per_page: u32,
    max_pages: u32,
    token: Option<String>,
}

impl GitHubReleaseSource {
    /// Creates a source for the given API base URL with default settings
    pub fn new(base_url: &str) -> Result<Self, ReleaseSourceError> {
        Self::from_config(&GitHubConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    /// Creates a source for api.github.com
    pub fn github() -> Result<Self, ReleaseSourceError> {
        Self::new(DEFAULT_GITHUB_API_URL)
    }

    pub fn from_config(config: &GitHubConfig) -> Result<Self, ReleaseSourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            per_page: config.per_page.clamp(1, 100),
            max_pages: MAX_PAGES,
            token: config.token.clone(),
        })
    }

    /// Caps the number of pages requested per fetch
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    async fn fetch_page(
        &self,
        repository: &Repository,
        page: u32,
    ) -> Result<Vec<ReleaseRecord>, ReleaseSourceError> {
        let url = format!(
            "{}/repos/{}/{}/releases?per_page={}&page={}",
            self.base_url,
            repository.owner(),
            repository.name(),
            self.per_page,
            page
        );

        let mut request = self
            .client
            .get(&url)
            .header(USER_AGENT, format!("{}-UpdateCheck", repository.name()))
            .header(ACCEPT, "application/vnd.github+json");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ReleaseSourceError::NotFound(repository.to_string()));
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(ReleaseSourceError::Unauthorized(repository.to_string()));
        }

        if is_rate_limited(status, response.headers()) {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(ReleaseSourceError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(ReleaseSourceError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub releases response: {}", e);
            ReleaseSourceError::InvalidResponse(e.to_string())
        })
    }
}

/// 429, or 403 once the primary rate limit is exhausted
fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }

    status == StatusCode::FORBIDDEN
        && headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0")
}

#[async_trait::async_trait]
impl ReleaseSource for GitHubReleaseSource {
    async fn fetch_releases(
        &self,
        repository: &Repository,
    ) -> Result<Vec<ReleaseRecord>, ReleaseSourceError> {
        let mut releases = Vec::new();

        for page in 1..=self.max_pages {
            let batch = self.fetch_page(repository, page).await?;
            let count = batch.len();
            releases.extend(batch);

            debug!("Fetched page {} of {}: {} releases", page, repository, count);

            if count < self.per_page as usize {
                return Ok(releases);
            }
        }

        warn!(
            "Stopped after {} full pages for {}; older releases were not fetched",
            self.max_pages, repository
        );
        Ok(releases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn page_query(per_page: u32, page: u32) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("per_page".into(), per_page.to_string()),
            Matcher::UrlEncoded("page".into(), page.to_string()),
        ])
    }

    fn source(server: &Server, per_page: u32, token: Option<&str>) -> GitHubReleaseSource {
        GitHubReleaseSource::from_config(&GitHubConfig {
            base_url: server.url(),
            per_page,
            token: token.map(str::to_string),
            ..Default::default()
        })
        .unwrap()
    }

    fn repo(owner: &str, name: &str) -> Repository {
        Repository::new(owner, name).unwrap()
    }

    #[tokio::test]
    async fn fetch_releases_returns_records_in_api_order() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/owner/app/releases")
            .match_query(page_query(100, 1))
            .match_header("user-agent", "app-UpdateCheck")
            .match_header("accept", "application/vnd.github+json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"tag_name": "v1.2.0-rc.1", "prerelease": true, "published_at": "2024-01-15T00:00:00Z"},
                    {"tag_name": "v1.1.0", "prerelease": false, "published_at": "2024-01-01T00:00:00Z"},
                    {"tag_name": null, "prerelease": false}
                ]"#,
            )
            .create_async()
            .await;

        let result = source(&server, 100, None)
            .fetch_releases(&repo("owner", "app"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            result.iter().map(ReleaseRecord::tag).collect::<Vec<_>>(),
            vec![Some("v1.2.0-rc.1"), Some("v1.1.0"), None]
        );
        assert!(result[0].prerelease);
        assert!(!result[1].prerelease);
    }

    #[tokio::test]
    async fn fetch_releases_follows_pages_until_short_page() {
        let mut server = Server::new_async().await;

        let first = server
            .mock("GET", "/repos/owner/app/releases")
            .match_query(page_query(2, 1))
            .with_status(200)
            .with_body(r#"[{"tag_name": "3.0.0"}, {"tag_name": "2.0.0"}]"#)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/repos/owner/app/releases")
            .match_query(page_query(2, 2))
            .with_status(200)
            .with_body(r#"[{"tag_name": "1.0.0"}]"#)
            .create_async()
            .await;

        let result = source(&server, 2, None)
            .fetch_releases(&repo("owner", "app"))
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(
            result.iter().map(ReleaseRecord::tag).collect::<Vec<_>>(),
            vec![Some("3.0.0"), Some("2.0.0"), Some("1.0.0")]
        );
    }

    #[tokio::test]
    async fn fetch_releases_stops_at_page_limit_when_every_page_is_full() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/owner/app/releases")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"tag_name": "1.0.0"}]"#)
            .expect(2)
            .create_async()
            .await;

        let result = source(&server, 1, None)
            .with_max_pages(2)
            .fetch_releases(&repo("owner", "app"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn fetch_releases_sends_bearer_token_when_configured() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/owner/app/releases")
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let result = source(&server, 100, Some("secret"))
            .fetch_releases(&repo("owner", "app"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn fetch_releases_returns_not_found_for_nonexistent_repo() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/nonexistent/repo/releases")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let result = source(&server, 100, None)
            .fetch_releases(&repo("nonexistent", "repo"))
            .await;

        mock.assert_async().await;
        assert!(
            matches!(result, Err(ReleaseSourceError::NotFound(name)) if name == "nonexistent/repo")
        );
    }

    #[tokio::test]
    async fn fetch_releases_returns_unauthorized_for_401() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/owner/app/releases")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message": "Bad credentials"}"#)
            .create_async()
            .await;

        let result = source(&server, 100, Some("expired"))
            .fetch_releases(&repo("owner", "app"))
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ReleaseSourceError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn fetch_releases_returns_rate_limited_for_429() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/owner/app/releases")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_header("retry-after", "60")
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let result = source(&server, 100, None)
            .fetch_releases(&repo("owner", "app"))
            .await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(ReleaseSourceError::RateLimited {
                retry_after_secs: Some(60)
            })
        ));
    }

    #[tokio::test]
    async fn fetch_releases_returns_rate_limited_for_exhausted_403() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/owner/app/releases")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_header("x-ratelimit-remaining", "0")
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let result = source(&server, 100, None)
            .fetch_releases(&repo("owner", "app"))
            .await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(ReleaseSourceError::RateLimited {
                retry_after_secs: None
            })
        ));
    }

    #[tokio::test]
    async fn fetch_releases_returns_invalid_response_for_other_errors() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/owner/app/releases")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let result = source(&server, 100, None)
            .fetch_releases(&repo("owner", "app"))
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ReleaseSourceError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn fetch_releases_returns_invalid_response_for_malformed_body() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/owner/app/releases")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"not": "a list"}"#)
            .create_async()
            .await;

        let result = source(&server, 100, None)
            .fetch_releases(&repo("owner", "app"))
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ReleaseSourceError::InvalidResponse(_))));
    }
}
