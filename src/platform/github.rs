use crate::config::GitHubConfig;
use crate::entity::{Account, Entity, EntityKind, EntityRef, Organization, RelationClass, Repository};
use crate::error::{FoafhubError, Result};
use crate::platform::{Connector, Platform, Quota};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

/// GitHub caps `per_page` at 100
const MAX_PER_PAGE: usize = 100;

const API_VERSION: &str = "2022-11-28";

/// `/users/{login}` and `/orgs/{login}` payload
#[derive(Debug, Deserialize)]
struct ProfilePayload {
    login: String,
    name: Option<String>,
    avatar_url: Option<String>,
    location: Option<String>,
    email: Option<String>,
    blog: Option<String>,
    html_url: Option<String>,
}

/// `/repos/{owner}/{repo}` payload
#[derive(Debug, Deserialize)]
struct RepoPayload {
    full_name: String,
    name: String,
    description: Option<String>,
    html_url: Option<String>,
    owner: SummaryPayload,
}

/// Account entry of a listing (following, members, contributors, orgs)
#[derive(Debug, Deserialize)]
struct SummaryPayload {
    login: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepoSummaryPayload {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct RateLimitPayload {
    rate: RatePayload,
}

#[derive(Debug, Deserialize)]
struct RatePayload {
    limit: u32,
    remaining: u32,
    reset: i64,
}

impl SummaryPayload {
    fn into_ref(self) -> EntityRef {
        match self.kind.as_deref() {
            Some("Organization") => EntityRef::organization(self.login),
            _ => EntityRef::account(self.login),
        }
    }
}

impl ProfilePayload {
    fn into_account(self) -> Account {
        Account {
            login: self.login,
            name: self.name,
            avatar_url: self.avatar_url,
            location: self.location,
            email: self.email,
            blog: self.blog,
            html_url: self.html_url,
        }
    }

    fn into_organization(self) -> Organization {
        Organization {
            login: self.login,
            name: self.name,
            avatar_url: self.avatar_url,
            location: self.location,
            email: self.email,
            blog: self.blog,
            html_url: self.html_url,
        }
    }
}

/// GitHub REST API client
///
/// Tracks the request quota from the `x-ratelimit-*` headers of every response.
pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: Option<String>,
    quota: Mutex<Quota>,
}

impl GitHubClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `config` - API URL, user agent and timeout
    /// * `token` - Optional access token; unauthenticated clients get a much smaller quota
    pub fn new(config: &GitHubConfig, token: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FoafhubError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token,
            quota: Mutex::new(Quota::unknown()),
        })
    }

    /// Query `/rate_limit` (free of charge) and refresh the cached quota.
    pub async fn rate_limit(&self) -> Result<Quota> {
        let payload: RateLimitPayload = self.get_json("/rate_limit").await?;
        let quota = Quota {
            remaining: payload.rate.remaining,
            limit: payload.rate.limit,
            reset_at: DateTime::<Utc>::from_timestamp(payload.rate.reset, 0),
        };
        self.store_quota(quota);
        Ok(quota)
    }

    async fn send(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = format!("{}{}", self.api_url, path);
        let mut request = self
            .http
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let observed = quota_from_headers(response.headers());
        if let Some(quota) = observed {
            self.store_quota(quota);
        }

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        Err(status_error(status, observed.map(|q| q.remaining), path, &body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(path, &[]).await?;
        read_json(response, path).await
    }

    /// Collect at most `limit` items of a paged listing.
    async fn list<T: DeserializeOwned>(&self, path: &str, limit: usize) -> Result<Vec<T>> {
        let mut items = Vec::new();
        if limit == 0 {
            return Ok(items);
        }

        let per_page = limit.min(MAX_PER_PAGE);
        let mut page = 1usize;
        while items.len() < limit {
            let query = [("per_page", per_page.to_string()), ("page", page.to_string())];
            let response = self.send(path, &query).await?;
            // Empty repositories answer the contributors listing with 204
            if response.status() == StatusCode::NO_CONTENT {
                break;
            }
            let batch: Vec<T> = read_json(response, path).await?;

            let last_page = batch.len() < per_page;
            let room = limit - items.len();
            items.extend(batch.into_iter().take(room));
            if last_page {
                break;
            }
            page += 1;
        }

        log::debug!("Listed {} item(s) from {}", items.len(), path);
        Ok(items)
    }

    fn store_quota(&self, quota: Quota) {
        if let Ok(mut cached) = self.quota.lock() {
            *cached = quota;
        }
    }

    async fn fetch_repository(&self, full_name: &str) -> Result<Repository> {
        let payload: RepoPayload = self.get_json(&format!("/repos/{}", full_name)).await?;
        let languages: BTreeMap<String, u64> = self
            .get_json(&format!("/repos/{}/languages", full_name))
            .await?;
        Ok(Repository {
            full_name: payload.full_name,
            name: payload.name,
            description: payload.description,
            html_url: payload.html_url,
            languages,
            owner: payload.owner.into_ref(),
        })
    }
}

#[async_trait]
impl Platform for GitHubClient {
    async fn fetch(&self, entity: &EntityRef) -> Result<Entity> {
        match entity.kind {
            EntityKind::Account => {
                let payload: ProfilePayload = self.get_json(&format!("/users/{}", entity.key)).await?;
                Ok(Entity::Account(payload.into_account()))
            }
            EntityKind::Organization => {
                let payload: ProfilePayload = self.get_json(&format!("/orgs/{}", entity.key)).await?;
                Ok(Entity::Organization(payload.into_organization()))
            }
            EntityKind::Repository => Ok(Entity::Repository(self.fetch_repository(&entity.key).await?)),
        }
    }

    async fn related(
        &self,
        entity: &EntityRef,
        class: RelationClass,
        limit: usize,
    ) -> Result<Vec<EntityRef>> {
        let key = &entity.key;
        let refs: Vec<EntityRef> = match (entity.kind, class) {
            (EntityKind::Account, RelationClass::Following) => self
                .list::<SummaryPayload>(&format!("/users/{}/following", key), limit)
                .await?
                .into_iter()
                .map(SummaryPayload::into_ref)
                .collect(),
            (EntityKind::Account, RelationClass::OwnedRepositories) => self
                .list::<RepoSummaryPayload>(&format!("/users/{}/repos", key), limit)
                .await?
                .into_iter()
                .map(|r| EntityRef::repository(r.full_name))
                .collect(),
            (EntityKind::Organization, RelationClass::OwnedRepositories) => self
                .list::<RepoSummaryPayload>(&format!("/orgs/{}/repos", key), limit)
                .await?
                .into_iter()
                .map(|r| EntityRef::repository(r.full_name))
                .collect(),
            (EntityKind::Account, RelationClass::Memberships) => self
                .list::<SummaryPayload>(&format!("/users/{}/orgs", key), limit)
                .await?
                .into_iter()
                .map(|o| EntityRef::organization(o.login))
                .collect(),
            (EntityKind::Organization, RelationClass::Members) => self
                .list::<SummaryPayload>(&format!("/orgs/{}/members", key), limit)
                .await?
                .into_iter()
                .map(SummaryPayload::into_ref)
                .collect(),
            (EntityKind::Repository, RelationClass::Contributors) => self
                .list::<SummaryPayload>(&format!("/repos/{}/contributors", key), limit)
                .await?
                .into_iter()
                .map(SummaryPayload::into_ref)
                .collect(),
            // A repository's owner comes with the fetched payload
            (kind, class) => {
                return Err(FoafhubError::InvalidInput(format!(
                    "{} has no '{}' relation",
                    kind, class
                )))
            }
        };
        Ok(refs)
    }

    fn quota(&self) -> Quota {
        self.quota
            .lock()
            .map(|q| *q)
            .unwrap_or_else(|_| Quota::unknown())
    }
}

/// Read the whole body, then decode it. A body cut off mid-read is a
/// network fault; a complete body that does not decode is a parse error.
async fn read_json<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
    let body = response
        .bytes()
        .await
        .map_err(|e| FoafhubError::Network(format!("{}: {}", path, e)))?;
    serde_json::from_slice(&body).map_err(|e| FoafhubError::Parse(format!("{}: {}", path, e)))
}

/// Parse `x-ratelimit-remaining`, `x-ratelimit-limit` and `x-ratelimit-reset`.
fn quota_from_headers(headers: &HeaderMap) -> Option<Quota> {
    let number = |name: &str| -> Option<i64> {
        headers.get(name)?.to_str().ok()?.trim().parse().ok()
    };
    let remaining = u32::try_from(number("x-ratelimit-remaining")?).ok()?;
    let limit = u32::try_from(number("x-ratelimit-limit")?).ok()?;
    let reset_at = number("x-ratelimit-reset").and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
    Some(Quota {
        remaining,
        limit,
        reset_at,
    })
}

/// Map a non-success status to the error taxonomy the crawler recovers from.
fn status_error(status: StatusCode, remaining: Option<u32>, path: &str, body: &str) -> FoafhubError {
    match status.as_u16() {
        403 | 429 if remaining == Some(0) => {
            FoafhubError::RateLimited(format!("{} (quota exhausted)", path))
        }
        429 => FoafhubError::RateLimited(format!("{} (secondary rate limit)", path)),
        403 | 451 => FoafhubError::PermissionDenied(format!("{}: {}", path, body.trim())),
        404 => FoafhubError::NotFound(path.to_string()),
        code => FoafhubError::Api {
            status: code,
            message: format!("{}: {}", path, body.trim()),
        },
    }
}

/// Connects [`GitHubClient`]s and seeds their quota from `/rate_limit`.
pub struct GitHubConnector {
    config: GitHubConfig,
    token: Option<String>,
}

impl GitHubConnector {
    pub fn new(config: GitHubConfig, token: Option<String>) -> Self {
        Self { config, token }
    }

    /// Build a client without contacting the API.
    pub fn client(&self) -> Result<GitHubClient> {
        GitHubClient::new(&self.config, self.token.clone())
    }
}

#[async_trait]
impl Connector for GitHubConnector {
    async fn connect(&self) -> Result<Box<dyn Platform>> {
        let client = self.client()?;
        let quota = client.rate_limit().await?;
        log::debug!("Connected to {} ({}/{} requests left)", self.config.api_url, quota.remaining, quota.limit);
        Ok(Box::new(client))
    }
}
